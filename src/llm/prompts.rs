//! Prompt templates. The storefront is Brazilian, so prompts and field
//! names stay in Portuguese to match the page text the model receives.

const CONDITIONS_TEMPLATE: &str = r#"Dado o seguinte texto de condições de pagamento e frete de um produto de e-commerce, extraia e normalize as informações relevantes.
Concentre-se em termos como parcelamento (número de parcelas, juros), desconto à vista (percentual ou valor), e condições de frete (grátis, valor, regiões).
Retorne em formato JSON. Se um campo não for encontrado ou não for aplicável, use null.

Campos a extrair:
- "tipo_pagamento_principal": Tipo principal de pagamento da oferta (ex: "boleto", "cartao_credito", "pix", "transferencia").
- "desconto_a_vista_percentual": Percentual de desconto para pagamento à vista (número, ex: 10 para 10%).
- "desconto_a_vista_valor": Valor do desconto fixo à vista (número).
- "parcelas_sem_juros": Número máximo de parcelas sem juros (número inteiro).
- "parcelas_com_juros": Número máximo de parcelas com juros (número inteiro).
- "texto_frete_gratis": Se há menção explícita de frete grátis (booleano).
- "condicao_frete_gratis": Condição para frete grátis (ex: "acima de R$X", "para região Y", "null").
- "texto_original_condicoes": O texto completo das condições de pagamento/frete fornecido.

Exemplos:
1. Texto: "R$ 1.500,00 no PIX (10% de desconto) ou em até 12x de R$ 150,00 sem juros"
   JSON: {"tipo_pagamento_principal": "pix", "desconto_a_vista_percentual": 10, "desconto_a_vista_valor": 150.00, "parcelas_sem_juros": 12, "parcelas_com_juros": null, "texto_frete_gratis": false, "condicao_frete_gratis": null, "texto_original_condicoes": "R$ 1.500,00 no PIX (10% de desconto) ou em até 12x de R$ 150,00 sem juros"}
2. Texto: "Frete Grátis para Sul e Sudeste nas compras acima de R$500"
   JSON: {"tipo_pagamento_principal": null, "desconto_a_vista_percentual": null, "desconto_a_vista_valor": null, "parcelas_sem_juros": null, "parcelas_com_juros": null, "texto_frete_gratis": true, "condicao_frete_gratis": "acima de R$500 para Sul e Sudeste", "texto_original_condicoes": "Frete Grátis para Sul e Sudeste nas compras acima de R$500"}
3. Texto: "Em até 10x sem juros no cartão ou 5% de desconto no boleto"
   JSON: {"tipo_pagamento_principal": "cartao_credito", "desconto_a_vista_percentual": 5, "desconto_a_vista_valor": null, "parcelas_sem_juros": 10, "parcelas_com_juros": null, "texto_frete_gratis": false, "condicao_frete_gratis": null, "texto_original_condicoes": "Em até 10x sem juros no cartão ou 5% de desconto no boleto"}

Texto das Condições:
"#;

const FEATURES_TEMPLATE: &str = r#"O texto a seguir contém especificações técnicas de um componente de hardware no formato HTML, com pares de "chave: valor".
Extraia todas as características e seus respectivos valores, normalizando os nomes das chaves para snake_case e convertendo valores numéricos quando apropriado.
Retorne em formato JSON. Se um campo não for encontrado ou não for aplicável, use null.
Desconsidere formatação HTML como <p>, <strong>, <br>.

Exemplo de input:
<p><strong>Marca:</strong><br>XFX</p><p><strong>Modelo:</strong><br>RX-76PQICKBY</p><p><strong>Bus Type:</strong><br>PCI-E 4.0</p>
<p><strong>Base clock Up to:</strong><br>1875 MHz</p><p><strong>Memory Size:</strong><br>8 GB</p><p><strong>DisplayPort 2.1:</strong><br>3x</p>

Exemplo de Output JSON:
{
  "marca": "XFX",
  "modelo": "RX-76PQICKBY",
  "bus_type": "PCI-E 4.0",
  "base_clock_up_to_mhz": 1875,
  "memory_size_gb": 8,
  "display_port_2_1_quantity": 3
}

Especificações Técnicas (HTML):
"#;

pub fn conditions_prompt(conditions_text: &str) -> String {
    with_input(CONDITIONS_TEMPLATE, conditions_text)
}

pub fn features_prompt(specs_html: &str) -> String {
    with_input(FEATURES_TEMPLATE, specs_html)
}

fn with_input(template: &str, input: &str) -> String {
    let mut prompt = String::with_capacity(template.len() + input.len() + 1);
    prompt.push_str(template);
    prompt.push_str(input);
    prompt.push('\n');
    prompt
}

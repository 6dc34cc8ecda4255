use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a scrape request, as reported to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("A URL do produto é obrigatória.")]
    MissingUrl,

    #[error("URL inválida: {0}")]
    InvalidUrl(String),

    #[error("Página incompleta: {0} não encontrado(a).")]
    IncompletePage(&'static str),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(i64),

    #[error("Erro ao carregar a página: {0:#}")]
    Fetch(anyhow::Error),

    #[error("Erro ao salvar dados no DB: {0:#}")]
    Storage(anyhow::Error),
}

pub mod product;
pub mod site;

pub use product::*;
pub use site::*;

pub const SCRAPE_SUCCESS_MESSAGE: &str = "Dados raspados e salvos com sucesso!";

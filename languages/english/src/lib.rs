pub mod dictionary;
mod mapper;
mod model;

pub use dictionary::OxfordDictionary;

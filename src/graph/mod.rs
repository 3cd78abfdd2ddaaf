pub mod catalog_dag;

pub use catalog_dag::CatalogDag;

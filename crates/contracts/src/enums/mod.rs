pub mod brand;
pub mod import_type;

pub use brand::Brand;
pub use import_type::ImportType;

mod ident;
mod relation;
mod statement;


pub use ident::{Ident, Literal};
pub use relation::{KeyShape, Projection, Relation};
pub use statement::{
    CopyTo, CountRows, CreateTempTable, Describe, Directive, DropTable, FileFormat, Filter, Select,
};

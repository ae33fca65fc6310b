pub mod data_type;
pub mod schema;
pub mod tuple;
pub mod value;

pub use data_type::DataType;
pub use schema::{ColumnDef, Schema};
pub use tuple::{null_padded_tuple, FrameTuple, Tuple, TupleView};
pub use value::Value;

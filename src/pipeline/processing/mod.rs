// Pipeline processing: parsing, party recoding, joins and aggregation

pub mod aggregate;
pub mod join;
pub mod normalize;
pub mod parser;

pub mod bwt;
pub mod corpus;
pub mod fm;
pub mod sa;

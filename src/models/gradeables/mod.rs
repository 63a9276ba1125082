pub mod autograding;
pub mod entities;
pub mod requests;

pub mod riot;

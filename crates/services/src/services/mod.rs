pub mod batch_validation;
pub mod decklist_parser;
pub mod normalizer;
pub mod retry;
pub mod scrollrack;

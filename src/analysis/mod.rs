pub mod char_unit;
pub mod ngram;

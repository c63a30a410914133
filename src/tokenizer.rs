pub mod grapheme_tokenizer;
pub mod line_tokenizer;
pub mod token;
pub mod usfm_tokenizer;
pub mod word_tokenizer;

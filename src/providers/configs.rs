pub mod base;
pub mod groq;

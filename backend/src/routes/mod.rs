pub mod airports;
pub mod combined;
pub mod longest;
pub mod profitable;

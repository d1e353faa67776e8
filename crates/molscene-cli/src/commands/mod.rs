pub mod discover;
pub mod inspect;
pub mod scene;

pub mod vector;

pub use self::vector::Vector;

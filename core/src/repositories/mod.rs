pub mod medicine;
pub mod user;

pub use medicine::{MedicineRepository, MockMedicineRepository};
pub use user::{MockUserRepository, UserRepository};

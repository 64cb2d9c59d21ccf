mod category_repo;
mod session_repo;

pub use category_repo::CategoryRepo;
pub use session_repo::SessionRepo;

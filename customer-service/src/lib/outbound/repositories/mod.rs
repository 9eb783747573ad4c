pub mod memory;
pub mod mongo;

pub use memory::InMemoryCustomerRepository;
pub use mongo::MongoCustomerRepository;

mod segment;

pub use segment::handle_job;

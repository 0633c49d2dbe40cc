mod inmemory;

pub use inmemory::InMemoryViewerCounter;

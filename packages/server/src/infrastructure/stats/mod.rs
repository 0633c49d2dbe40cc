mod inmemory;

pub use inmemory::InMemoryStatsRepository;

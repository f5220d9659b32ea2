mod fixture;

pub use fixture::FixtureSource;

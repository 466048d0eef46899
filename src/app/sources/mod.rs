pub mod headhunter;
pub mod superjob;

pub use headhunter::HeadHunterFetcher;
pub use superjob::SuperJobFetcher;

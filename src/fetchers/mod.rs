pub mod peak_rank_scraper;

pub use peak_rank_scraper::PeakRankScraper;

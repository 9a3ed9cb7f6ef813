mod image_fetcher;

pub use image_fetcher::HttpImageFetcher;

pub mod u508_fetch_from_trendyol;

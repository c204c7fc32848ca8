pub mod ai;
pub mod storage;
pub mod trip_parser;

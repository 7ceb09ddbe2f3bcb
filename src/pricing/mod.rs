pub mod ev;

pub mod progress_bar;
pub mod result_popup;
pub mod stats_panel;
pub mod verb_card;
pub mod verb_table;

pub mod admin_nav;
pub mod data_table;
pub mod filter_select;
pub mod form;
pub mod header;
pub mod mobile_view;
pub mod modal;
pub mod pagination;
pub mod responsive_view;
pub mod search_box;
pub mod star_rating;
pub mod stat_card;
pub mod status;
pub mod toast;

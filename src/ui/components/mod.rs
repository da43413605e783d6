pub mod capacity_view;
pub mod chart;
pub mod dashboard;
pub mod guide_view;
pub mod menu;
pub mod planner_view;
pub mod progress_bar;
pub mod quiz_card;
pub mod review_list;
pub mod speed_math_view;
pub mod toast;
pub mod training_calendar;

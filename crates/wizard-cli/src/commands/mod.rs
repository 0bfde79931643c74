pub mod group;
pub mod info;
pub mod neighbor;
pub mod pka;
pub mod rmse;
pub mod run;

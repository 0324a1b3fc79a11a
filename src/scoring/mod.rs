pub mod formulas;
pub mod totals;
pub mod engine;
pub mod validation;

pub use formulas::{
    compute_dots, compute_ipf, compute_ipf_gl, compute_score, compute_wilks, compute_wilks2,
    Formula, Sex,
};
pub use totals::calculate_total_lifts;
pub use engine::{recompute, recompute_all, score_card, ScoreCard};
pub use validation::validate_lifter;

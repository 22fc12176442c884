pub mod emi;
pub mod schedule;

pub use emi::{compute_installment, monthly_rate, try_installment};
pub use schedule::{
    build_amortization_summary, calculate_loan_cost, AmortizationSummary, LoanCostOutput,
    PeriodRecord,
};

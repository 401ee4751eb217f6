use shared::AllowanceRunResponse;

use crate::domain::commands::allowance::AccrualReport;

pub struct AllowanceMapper;

impl AllowanceMapper {
    pub fn to_run_response(report: AccrualReport) -> AllowanceRunResponse {
        AllowanceRunResponse {
            ok: report.failures.is_empty(),
            credited_periods: report.credited_periods(),
            failed_children: report.failed_child_ids(),
        }
    }
}

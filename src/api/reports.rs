//! Read-only dashboard, report and governor register endpoints.
use super::HttpApi;
use crate::error::Result;
use crate::model::{
    ActivityLog, ApproverPerformance, DashboardStats, GovernorCofo, GovernorCofoPage,
    GovernorCofoResponse, GovernorStatusReport, InboxBacklogItem, InboxTask, LocationReport,
    MonthlyTrend, ProcessingTimeReport, ReviewerPerformance, StageDelayReport, TrendReport,
};
use crate::session::Role;

/// Governors read their own dashboard; everyone else reads the reviewer one.
pub(crate) fn dashboard_path(role: &Role) -> &'static str {
    if role.is_governor() {
        "/internal-users/dashboard/governor"
    } else {
        "/internal-users/dashboard"
    }
}

/// Register path; zero or absent paging values are left to the backend.
pub(crate) fn governor_cofos_path(page: Option<u32>, limit: Option<u32>) -> String {
    let params = [("page", page), ("limit", limit)]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .filter(|value| *value > 0)
                .map(|value| format!("{key}={value}"))
        })
        .collect::<Vec<_>>();
    if params.is_empty() {
        "/cofo/governor/cofos".to_string()
    } else {
        format!("/cofo/governor/cofos?{}", params.join("&"))
    }
}

impl HttpApi {
    pub fn governor_cofos(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<GovernorCofoPage> {
        self.get_json(&governor_cofos_path(page, limit))
    }

    pub fn governor_cofo(&self, cofo_id: &str) -> Result<GovernorCofo> {
        let response: GovernorCofoResponse = self.get_json(&format!(
            "/cofo/governor/cofo/{}",
            urlencoding::encode(cofo_id)
        ))?;
        Ok(response.into_cofo())
    }

    pub fn dashboard_stats(&self, role: &Role) -> Result<DashboardStats> {
        self.get_json(dashboard_path(role))
    }

    pub fn inbox_tasks(&self) -> Result<Vec<InboxTask>> {
        self.get_json("/internal-users/inbox/my-tasks")
    }

    pub fn activity_logs(&self) -> Result<Vec<ActivityLog>> {
        self.get_json("/internal-users/activity")
    }

    pub fn monthly_trends(&self) -> Result<Vec<MonthlyTrend>> {
        self.get_json("/internal-users/monthly-trends")
    }

    pub fn status_report(&self) -> Result<GovernorStatusReport> {
        self.get_json("/internal-users/reports/status")
    }

    pub fn processing_time_report(&self) -> Result<ProcessingTimeReport> {
        self.get_json("/internal-users/reports/processing-time")
    }

    pub fn location_report(&self) -> Result<Vec<LocationReport>> {
        self.get_json("/internal-users/reports/location")
    }

    pub fn trend_report(&self) -> Result<TrendReport> {
        self.get_json("/internal-users/reports/trends")
    }

    pub fn reviewer_performance(&self) -> Result<Vec<ReviewerPerformance>> {
        self.get_json("/internal-users/reports/reviewer-performance")
    }

    pub fn approver_performance(&self) -> Result<Vec<ApproverPerformance>> {
        self.get_json("/internal-users/governor/reports/approver-performance")
    }

    pub fn stage_delays(&self) -> Result<Vec<StageDelayReport>> {
        self.get_json("/internal-users/governor/reports/stage-delays")
    }

    pub fn inbox_backlog(&self) -> Result<Vec<InboxBacklogItem>> {
        self.get_json("/internal-users/governor/reports/inbox-backlog")
    }
}

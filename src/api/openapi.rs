//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use super::dto::{
    AdminStatusResponse, BattleView, CreateBattleRequest, CreateMemberRequest,
    EligibilityResponse, MemberStatsResponse, UpdateMemberRequest, VoteRequest, VoteResponse,
};
use super::handlers::{admin, battles, members, system, votes};
use crate::domain::{BattleStats, Member, TimeLeft, VoteCounters};
use crate::error::{ErrorBody, ErrorKind, ErrorResponse};
use crate::service::MemberQuota;

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "intuit-battle",
        description = "Community battles with stake-backed wallet voting"
    ),
    paths(
        system::health_handler,
        members::list_members,
        members::create_member,
        members::update_member,
        members::member_stats,
        battles::list_battles,
        battles::get_battle,
        battles::create_battle,
        votes::eligibility,
        votes::cast_vote,
        admin::admin_status,
    ),
    components(schemas(
        Member,
        BattleView,
        BattleStats,
        VoteCounters,
        TimeLeft,
        MemberQuota,
        CreateMemberRequest,
        UpdateMemberRequest,
        CreateBattleRequest,
        MemberStatsResponse,
        EligibilityResponse,
        VoteRequest,
        VoteResponse,
        AdminStatusResponse,
        ErrorResponse,
        ErrorBody,
        ErrorKind,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Members", description = "Member directory, edits, and statistics"),
        (name = "Battles", description = "Battles between two members"),
        (name = "Votes", description = "Stake-backed voting"),
        (name = "Admin", description = "Admin allow-list"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_vote_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/battles/{id}/votes"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/api/v1/members/{id}"));
    }
}

use super::*;
use crate::model::ApplicationStatus::*;
use crate::model::DocumentStatus::{Approved as DocApproved, Pending, Rejected as DocRejected};
use crate::testing::{application, document, governor, reviewer, ScriptedConfirm};

#[test]
fn rejected_document_blocks_approval_without_prompting() {
    let app = application(
        "a1",
        InReview,
        vec![document("d1", DocApproved), document("d2", DocRejected)],
    );
    let mut confirm = ScriptedConfirm::answering(true);
    let err = prepare_approval(&app, &reviewer(), "ok", None, &mut confirm).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("rejected"));
    assert_eq!(confirm.asked, 0);
}

#[test]
fn all_approved_non_governor_omits_plot_number() {
    let app = application(
        "a1",
        InReview,
        vec![document("d1", DocApproved), document("d2", DocApproved)],
    );
    let mut confirm = ScriptedConfirm::answering(false);
    let prepared = prepare_approval(&app, &reviewer(), "looks good", Some("PLOT-7"), &mut confirm)
        .expect("prepare approval");
    let Prepared::Ready(decision) = prepared else {
        panic!("expected a ready decision");
    };
    assert_eq!(confirm.asked, 0);
    assert_eq!(decision.payload.plot_number, None);
    assert_eq!(decision.expected, ExpectedOutcome::NextStage);
    assert_eq!(
        serde_json::to_value(&decision.payload).expect("serialize payload"),
        serde_json::json!({"action": "APPROVE", "message": "looks good"})
    );
}

#[test]
fn governor_needs_plot_number_and_it_is_trimmed() {
    let app = application("a1", InReview, vec![document("d1", DocApproved)]);
    let mut confirm = ScriptedConfirm::answering(true);

    for missing in [None, Some(""), Some("   ")] {
        let err = prepare_approval(&app, &governor(), "final", missing, &mut confirm).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Missing Plot Number"));
    }

    let prepared = prepare_approval(&app, &governor(), "final", Some("  PL-0042 "), &mut confirm)
        .expect("prepare governor approval");
    let Prepared::Ready(decision) = prepared else {
        panic!("expected a ready decision");
    };
    assert_eq!(decision.payload.plot_number.as_deref(), Some("PL-0042"));
    assert_eq!(decision.expected, ExpectedOutcome::Status(Approved));
    assert_eq!(
        serde_json::to_value(&decision.payload).expect("serialize payload"),
        serde_json::json!({"action": "APPROVE", "message": "final", "plotNumber": "PL-0042"})
    );
}

#[test]
fn governor_role_match_is_case_insensitive() {
    let mut actor = governor();
    actor.role = crate::session::Role::parse("GoVeRnOr");
    let app = application("a1", InReview, vec![]);
    let mut confirm = ScriptedConfirm::answering(true);
    assert!(prepare_approval(&app, &actor, "", None, &mut confirm).is_err());
    assert!(available_actions(&app, &actor).plot_number_required);
}

#[test]
fn blank_reason_or_notes_fail_validation() {
    let app = application("a1", NeedsCorrection, vec![document("d1", Pending)]);
    for blank in [None, Some(""), Some(" \t\n")] {
        assert!(prepare_rejection(&app, &reviewer(), blank)
            .unwrap_err()
            .is_validation());
        assert!(prepare_send_back(&app, &reviewer(), blank)
            .unwrap_err()
            .is_validation());
    }
}

#[test]
fn pending_documents_ask_for_confirmation() {
    let app = application("a1", InReview, vec![document("d1", Pending)]);

    let mut decline = ScriptedConfirm::answering(false);
    let prepared =
        prepare_approval(&app, &reviewer(), "notes", None, &mut decline).expect("prepare");
    assert_eq!(prepared, Prepared::Declined);
    assert_eq!(decline.asked, 1);

    let mut accept = ScriptedConfirm::answering(true);
    let prepared =
        prepare_approval(&app, &reviewer(), "notes", None, &mut accept).expect("prepare");
    let Prepared::Ready(decision) = prepared else {
        panic!("expected a ready decision");
    };
    assert_eq!(
        decision.payload,
        DecisionPayload {
            action: DecisionAction::Approve,
            message: Some("notes".to_string()),
            plot_number: None,
        }
    );
}

#[test]
fn send_back_and_reject_share_the_reject_verb() {
    let app = application("a1", NeedsCorrection, vec![]);
    let send_back =
        prepare_send_back(&app, &reviewer(), Some("fix survey plan")).expect("send back");
    let reject = prepare_rejection(&app, &reviewer(), Some("fix survey plan")).expect("reject");

    assert_eq!(send_back.payload, reject.payload);
    assert_eq!(
        serde_json::to_value(&send_back.payload).expect("serialize"),
        serde_json::json!({"action": "REJECT", "message": "fix survey plan"})
    );
    assert_eq!(send_back.intent, DecisionIntent::SendBack);
    assert_eq!(send_back.expected, ExpectedOutcome::Status(NeedsCorrection));
    assert_eq!(reject.expected, ExpectedOutcome::Status(RejectedFinal));
}

#[test]
fn terminal_and_draft_applications_accept_no_decisions() {
    for status in [Approved, RejectedFinal, Draft] {
        let app = application("a1", status, vec![document("d1", DocApproved)]);
        let actions = available_actions(&app, &governor());
        assert!(
            !(actions.approve || actions.reject || actions.send_back),
            "{status} should be closed"
        );
        assert!(ensure_open(&app, DecisionIntent::Reject).is_err());
        assert!(actions.document_actions);

        let mut confirm = ScriptedConfirm::answering(true);
        assert!(
            prepare_approval(&app, &governor(), "", Some("P-1"), &mut confirm)
                .unwrap_err()
                .is_validation()
        );
        assert!(prepare_rejection(&app, &reviewer(), Some("no"))
            .unwrap_err()
            .is_validation());
    }
}

#[test]
fn available_actions_track_document_states() {
    let rejected = application(
        "a1",
        Resubmitted,
        vec![document("d1", Pending), document("d2", DocRejected)],
    );
    let actions = available_actions(&rejected, &reviewer());
    assert!(!actions.approve);
    assert!(!actions.approve_needs_confirmation);
    assert!(actions.reject && actions.send_back);
    assert!(!actions.plot_number_required);

    let pending = application("a2", InReview, vec![document("d1", Pending)]);
    let actions = available_actions(&pending, &reviewer());
    assert!(actions.approve);
    assert!(actions.approve_needs_confirmation);
}

#[test]
fn predicates_treat_absent_status_as_pending() {
    let docs: Vec<CofoDocument> = serde_json::from_str(
        r#"[{"id":"d1"},{"id":"d2","status":null},{"id":"d3","status":"APPROVED"}]"#,
    )
    .expect("parse documents");
    assert!(any_pending(&docs));
    assert!(!any_rejected(&docs));
    let tally = DocumentTally::of(&docs);
    assert_eq!(
        tally,
        DocumentTally {
            pending: 2,
            approved: 1,
            rejected: 0
        }
    );

    let all_approved = vec![document("d1", DocApproved)];
    assert!(!any_pending(&all_approved));
    assert!(!any_pending(&[]));
}

#[test]
fn document_rejection_needs_message() {
    let doc = document("d1", Pending);
    assert!(prepare_document_rejection(&doc, Some("  ")).is_err());
    let update =
        prepare_document_rejection(&doc, Some(" blurry scan ")).expect("reject document");
    assert_eq!(
        serde_json::to_value(&update).expect("serialize"),
        serde_json::json!({"status": "REJECTED", "rejectionMessage": "blurry scan"})
    );

    let approved = document("d2", DocApproved);
    assert_eq!(
        serde_json::to_value(prepare_document_approval(&approved)).expect("serialize"),
        serde_json::json!({"status": "APPROVED"})
    );
}

#[test]
fn transition_table_keeps_terminal_states_closed() {
    assert!(Draft.can_transition_to(InReview));
    assert!(!Draft.can_transition_to(Approved));
    assert!(InReview.can_transition_to(InReview));
    assert!(InReview.can_transition_to(NeedsCorrection));
    assert!(NeedsCorrection.can_transition_to(Resubmitted));
    assert!(!NeedsCorrection.can_transition_to(InReview));
    assert!(Resubmitted.can_transition_to(InReview));
    for next in [Draft, InReview, NeedsCorrection, Resubmitted, Approved, RejectedFinal] {
        assert!(!Approved.can_transition_to(next));
        assert!(!RejectedFinal.can_transition_to(next));
    }
}

#[test]
fn expected_outcome_matching() {
    assert!(ExpectedOutcome::NextStage.matches(InReview, InReview));
    assert!(ExpectedOutcome::NextStage.matches(Resubmitted, Approved));
    assert!(!ExpectedOutcome::NextStage.matches(InReview, NeedsCorrection));
    assert!(ExpectedOutcome::Status(NeedsCorrection).matches(InReview, NeedsCorrection));
    assert!(!ExpectedOutcome::Status(Approved).matches(InReview, InReview));
}

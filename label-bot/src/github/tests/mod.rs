use crate::Repository;
use crate::github::tests::test_utils::{PullRequestData, RepoModel, writer};

mod test_utils;

#[test]
fn plan_noop() {
    let model = RepoModel::default();
    let gh = model.gh_model();
    let plan = model.plan(gh);
    assert!(plan.is_empty());
}

#[test]
fn plan_label_pull_request() {
    let mut model = RepoModel::default();
    model.create_pull(PullRequestData::new(12400).label("bot"));
    let gh = model.gh_model();
    let plan = model.plan(gh);
    insta::assert_debug_snapshot!(plan, @r###"
    LabelPlan {
        repo: Repository {
            org: "cockpit-project",
            name: "cockpit",
        },
        pulls: [
            LabelPullRequest {
                number: 12400,
                title: "Fix the tests",
                author: "martinpitt",
                labels: [
                    "bot",
                    "needs-rebase",
                ],
                comment: "Needs to rebase to master since #12367 changed tests names",
            },
        ],
    }
    "###);
}

#[test]
fn plan_skip_already_labeled() {
    let mut model = RepoModel::default();
    model.create_pull(PullRequestData::new(12400).label("needs-rebase"));
    model.create_pull(
        PullRequestData::new(12401)
            .title("storage: Support LUKS2".to_string())
            .author("garrett".to_string()),
    );
    let gh = model.gh_model();
    let plan = model.plan(gh);
    insta::assert_debug_snapshot!(plan, @r###"
    LabelPlan {
        repo: Repository {
            org: "cockpit-project",
            name: "cockpit",
        },
        pulls: [
            LabelPullRequest {
                number: 12401,
                title: "storage: Support LUKS2",
                author: "garrett",
                labels: [
                    "needs-rebase",
                ],
                comment: "Needs to rebase to master since #12367 changed tests names",
            },
        ],
    }
    "###);
}

#[test]
fn plan_uses_current_labels() {
    let mut model = RepoModel::default();
    model.create_pull(PullRequestData::new(12400));
    let mut gh = model.gh_model();
    gh.add_label(12400, "needs-rebase");
    let plan = model.plan(gh);
    assert!(plan.is_empty());
}

#[test]
fn plan_from_updated_model() {
    let mut model = RepoModel::default();
    model.create_pull(PullRequestData::new(12400));
    model.create_pull(PullRequestData::new(12401));
    let gh = model.gh_model();
    assert_eq!(model.label_all(gh, &writer(true), false).unwrap(), 2);

    model.get_pull(12400).add_label("needs-rebase");
    let gh = model.gh_model();
    assert_eq!(model.label_all(gh, &writer(true), false).unwrap(), 1);
}

#[test]
fn plan_ignore_closed_pull_requests() {
    let mut model = RepoModel::default();
    model.create_pull(PullRequestData::new(12400));
    model.create_pull(PullRequestData::new(12401).label("blocked"));
    let mut gh = model.gh_model();
    gh.close_pull(12400);
    let plan = model.plan(gh);
    insta::assert_debug_snapshot!(plan, @r###"
    LabelPlan {
        repo: Repository {
            org: "cockpit-project",
            name: "cockpit",
        },
        pulls: [
            LabelPullRequest {
                number: 12401,
                title: "Fix the tests",
                author: "martinpitt",
                labels: [
                    "blocked",
                    "needs-rebase",
                ],
                comment: "Needs to rebase to master since #12367 changed tests names",
            },
        ],
    }
    "###);
}

#[test]
fn dry_run_sends_nothing() {
    let mut model = RepoModel::default();
    model.create_pull(PullRequestData::new(12400));
    let plan = model.plan(model.gh_model());
    assert_eq!(plan.apply(&writer(true)).unwrap(), 1);

    let repo: Repository = "cockpit-project/cockpit".parse().unwrap();
    let labels = ["needs-rebase".to_string()];
    writer(true).set_labels(&repo, 12400, &labels).unwrap();
    writer(true).add_comment(&repo, 12400, "rebase please").unwrap();
}

#[test]
fn only_print_plan_applies_nothing() {
    let mut model = RepoModel::default();
    model.create_pull(PullRequestData::new(12400));
    // A live writer would fail on its first request.
    let labeled = model.label_all(model.gh_model(), &writer(false), true).unwrap();
    assert_eq!(labeled, 0);
}

#[test]
fn nothing_to_label() {
    let mut model = RepoModel::default();
    model.create_pull(PullRequestData::new(12400).label("needs-rebase"));
    let labeled = model.label_all(model.gh_model(), &writer(false), false).unwrap();
    assert_eq!(labeled, 0);
}

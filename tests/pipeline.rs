use edupulse::aggregate::Aggregation;
use edupulse::dashboard::{render, ProfilePanel, Screen};
use edupulse::export::{read_csv, write_csv};
use edupulse::filter::{filter, FilterSelection, SectionFilter};
use edupulse::generator::{generate, GenerationPolicy};
use edupulse::models::Record;
use edupulse::session::{Credentials, Session};
use edupulse::DashboardError;

fn scenario() -> Vec<Record> {
    vec![
        Record::new(1001, "T1", "SecA", 30, 1, 80.0, 2).unwrap(),
        Record::new(1002, "T1", "SecA", 90, 2, 95.0, 5).unwrap(),
        Record::new(1003, "T2", "SecB", 45, 9, 70.0, 1).unwrap(),
    ]
}

#[test]
fn three_record_walkthrough() {
    let ds = scenario();
    let risks: Vec<bool> = ds.iter().map(Record::risk_status).collect();
    assert_eq!(risks, vec![true, false, true]);

    let t1 = filter(&ds, &FilterSelection::new(["T1"], SectionFilter::All));
    assert_eq!(t1, ds[..2]);
    assert_eq!(Aggregation::new(&t1).mean_score(), Some(60.0));
    assert_eq!(Aggregation::new(&ds).count_at_risk(), 2);

    let err = Aggregation::new(&ds).individual_profile("Ghost").unwrap_err();
    assert!(matches!(err, DashboardError::NotFound(_)));
}

#[test]
fn editing_score_recomputes_risk() {
    let mut ds = scenario();
    ds[0].set_score(75).unwrap();
    assert!(!ds[0].risk_status());
    ds[0].set_late_count(10);
    assert!(ds[0].risk_status());
}

#[test]
fn exported_bytes_are_reproducible() {
    let render_bytes = || {
        let ds = generate(300, 99, GenerationPolicy::Realistic).unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &ds).unwrap();
        out
    };
    let first = render_bytes();
    assert_eq!(first, render_bytes());

    let reloaded = read_csv(first.as_slice()).unwrap();
    assert_eq!(reloaded.len(), 300);
}

#[test]
fn session_lifecycle_gates_rendering() {
    let ds = generate(60, 99, GenerationPolicy::Uniform).unwrap();
    let selection = FilterSelection::all(&ds);
    let creds = Credentials::default();
    let mut session = Session::start();

    assert_eq!(render(&session, &ds, &selection, None), Screen::Login);

    session.authenticate("admin", "1234", &creds);
    let Screen::Dashboard(view) = render(&session, &ds, &selection, None) else {
        panic!("expected dashboard after login");
    };
    assert_eq!(view.kpis.record_count, 60);
    assert!(matches!(view.profile, ProfilePanel::Ready(_)));

    session.logout();
    assert_eq!(render(&session, &ds, &selection, None), Screen::Login);
}

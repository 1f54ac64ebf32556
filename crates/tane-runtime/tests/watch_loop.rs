//! Scheduler runs against an in-memory site on fake time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tane_models::DetailLevel;
use tane_runtime::{
    Exit, Notifier, NotifyChannel, RuntimeError, Scheduler, SchedulerState, Step, TicketSet,
    TimeSource, WatchConfig, EXPIRED_TITLE,
};
use tane_session::{Credentials, MemoryClient, SessionManager, SiteConfig, StaticCredentials};

const BASE: &str = "https://noctane.test";

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

/// Time that only moves when slept on.
#[derive(Clone, Default)]
struct FakeTime {
    now: Rc<Cell<i64>>,
    sleeps: Rc<RefCell<Vec<Duration>>>,
    /// Report shutdown once this many sleeps happened.
    stop_after: Option<usize>,
}

impl FakeTime {
    fn at(now: i64) -> Self {
        let time = Self::default();
        time.now.set(now);
        time
    }

    fn stop_after(mut self, sleeps: usize) -> Self {
        self.stop_after = Some(sleeps);
        self
    }

    fn set(&self, now: i64) {
        self.now.set(now);
    }

    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl TimeSource for FakeTime {
    fn now(&self) -> i64 {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration) -> bool {
        let mut sleeps = self.sleeps.borrow_mut();
        if self.stop_after.is_some_and(|limit| sleeps.len() >= limit) {
            return false;
        }
        sleeps.push(duration);
        self.now.set(self.now.get() + duration.as_secs() as i64);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Sent {
    at: i64,
    title: String,
    message: String,
}

#[derive(Clone)]
struct Recorder {
    now: Rc<Cell<i64>>,
    sent: Rc<RefCell<Vec<Sent>>>,
}

impl Recorder {
    fn on(time: &FakeTime) -> Self {
        Self {
            now: Rc::clone(&time.now),
            sent: Rc::default(),
        }
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.borrow().clone()
    }

    fn titles(&self) -> Vec<String> {
        self.sent().into_iter().map(|s| s.title).collect()
    }
}

impl Notifier for Recorder {
    fn notify(&mut self, title: &str, message: &str) {
        self.sent.borrow_mut().push(Sent {
            at: self.now.get(),
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

fn row(class: &str, number: &str, description: &str) -> String {
    format!(
        r#"<tr class="{class}"><td>{number}</td><td><a href="/noc/tickets/{number}">{number}</a></td>
        <td>{description}</td><td>Acme</td><td>Jane Doe</td><td>Bob</td><td>Here</td>
        <td>*</td><td>Open</td><td>2024-01-01</td><td>2024-01-02</td></tr>"#
    )
}

fn listing(rows: &[String]) -> String {
    format!(
        "<html><head><title>Tickets Assigned to Me \u{2013} Noctane</title></head>\
         <body><table>{}</table></body></html>",
        rows.concat()
    )
}

const LOGIN_PAGE: &str = r#"<html><head><title>Noctane Login</title></head><body>
    <form action="/session" method="post">
      <input name="session[email]"><input type="password" name="session[password]">
    </form></body></html>"#;

fn site(rows: &[String]) -> MemoryClient {
    MemoryClient::new()
        .with_page(url("/sign_in"), LOGIN_PAGE)
        .with_page(url("/dashboard"), "<title>Dashboard \u{2013} Noctane</title>")
        .with_page(url("/noc/tickets/mine"), listing(rows))
        .on_submit(|_, _| url("/dashboard"))
}

fn scheduler(client: MemoryClient, config: WatchConfig, time: &FakeTime, recorder: &Recorder) -> Scheduler {
    let manager = SessionManager::new(SiteConfig::new().with_base_url(BASE));
    let mut creds = StaticCredentials::new([Credentials::new("alice", "secret")]);
    let session = manager.login(Box::new(client), &mut creds).unwrap();
    Scheduler::new(
        manager,
        session,
        config,
        Box::new(time.clone()),
        Box::new(recorder.clone()),
    )
}

fn both_kinds() -> Vec<String> {
    vec![
        row("ticket", "1", "Old printer issue"),
        row("ticket due", "2", "Server down"),
    ]
}

#[test]
fn test_first_step_polls_immediately() {
    let time = FakeTime::at(1_700_000_000);
    let recorder = Recorder::on(&time);
    let mut scheduler = scheduler(site(&both_kinds()), WatchConfig::default(), &time, &recorder);

    let step = scheduler.step().unwrap();

    let Step::Polled(report) = step else {
        panic!("expected a poll, got {step:?}");
    };
    assert_eq!(report.tickets, 1);
    assert_eq!(report.new_tickets, 1);
    assert_eq!(report.fired, vec!["new-tickets", "old-tickets"]);
    assert_eq!(scheduler.poll_clock().last_fired, 1_700_000_000);
    assert_eq!(scheduler.state(), SchedulerState::Notifying);
}

#[test]
fn test_poll_clock_boundary() {
    let time = FakeTime::at(1000);
    let recorder = Recorder::on(&time);
    let mut scheduler = scheduler(site(&[]), WatchConfig::default(), &time, &recorder);

    assert!(matches!(scheduler.step().unwrap(), Step::Polled(_)));
    assert_eq!(scheduler.poll_clock().last_fired, 1000);

    time.set(1059);
    assert_eq!(scheduler.step().unwrap(), Step::Slept);
    assert_eq!(scheduler.state(), SchedulerState::Sleeping);
    assert_eq!(time.sleeps(), vec![Duration::from_secs(2)]);
    assert_eq!(scheduler.poll_clock().last_fired, 1000);

    time.set(1061);
    assert!(matches!(scheduler.step().unwrap(), Step::Polled(_)));
    assert_eq!(scheduler.poll_clock().last_fired, 1061);
}

#[test]
fn test_sleep_until_boundary() {
    let time = FakeTime::at(1000);
    let recorder = Recorder::on(&time);
    let mut scheduler = scheduler(site(&[]), WatchConfig::default(), &time, &recorder);
    scheduler.step().unwrap();

    time.set(1010);
    assert_eq!(scheduler.step().unwrap(), Step::Slept);

    assert_eq!(time.sleeps(), vec![Duration::from_secs(50)]);
}

#[test]
fn test_grace_period_between_channels() {
    let time = FakeTime::at(5000);
    let recorder = Recorder::on(&time);
    let mut scheduler = scheduler(site(&both_kinds()), WatchConfig::default(), &time, &recorder);

    scheduler.step().unwrap();

    let sent = recorder.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].title, "New tickets");
    assert_eq!(sent[0].message, "2024-01-02 Server down (Jane Doe)");
    assert_eq!(sent[1].title, "Old tickets");
    assert_eq!(sent[1].message, "2024-01-02 Old printer issue (Jane Doe)");
    assert!(sent[1].at - sent[0].at >= 10);
    assert_eq!(time.sleeps(), vec![Duration::from_secs(10)]);
}

#[test]
fn test_no_grace_when_only_one_channel_fires() {
    let time = FakeTime::at(5000);
    let recorder = Recorder::on(&time);
    let mut scheduler = scheduler(
        site(&[row("ticket", "1", "Old printer issue")]),
        WatchConfig::default(),
        &time,
        &recorder,
    );

    let Step::Polled(report) = scheduler.step().unwrap() else {
        panic!("expected a poll");
    };

    assert_eq!(report.fired, vec!["old-tickets"]);
    assert!(time.sleeps().is_empty());
}

#[test]
fn test_channels_keep_their_own_pace() {
    let time = FakeTime::at(10_000);
    let recorder = Recorder::on(&time);
    let mut scheduler = scheduler(site(&both_kinds()), WatchConfig::default(), &time, &recorder);

    scheduler.step().unwrap();
    assert_eq!(recorder.titles(), vec!["New tickets", "Old tickets"]);

    // Channel clocks are stamped with the poll time, not the post-grace time.
    time.set(10_100);
    let Step::Polled(report) = scheduler.step().unwrap() else {
        panic!("expected a poll");
    };
    assert_eq!(report.fired, vec!["new-tickets"]);

    time.set(10_601);
    let Step::Polled(report) = scheduler.step().unwrap() else {
        panic!("expected a poll");
    };
    assert_eq!(report.fired, vec!["new-tickets", "old-tickets"]);
}

#[test]
fn test_session_expiry_notifies_and_stops() {
    let time = FakeTime::at(1000);
    let recorder = Recorder::on(&time);
    let client = site(&both_kinds());
    let observer = client.clone();
    let mut scheduler = scheduler(client, WatchConfig::default(), &time, &recorder);

    observer.set_redirect(url("/noc/tickets/mine"), url("/sign_in"));

    assert_eq!(scheduler.run().unwrap(), Exit::Expired);
    assert_eq!(scheduler.state(), SchedulerState::Failed);
    assert!(scheduler.state().is_terminal());
    assert_eq!(recorder.titles(), vec![EXPIRED_TITLE]);
    assert!(!scheduler.session().is_authenticated());
}

#[test]
fn test_expiry_during_detail_fetch_notifies_and_stops() {
    let time = FakeTime::at(1000);
    let recorder = Recorder::on(&time);
    let client = site(&[row("ticket due", "2", "Server down")])
        .with_redirect(url("/noc/tickets/2"), url("/sign_in"));
    let mut scheduler = scheduler(
        client,
        WatchConfig::default().with_detail_level(DetailLevel::NewOnly),
        &time,
        &recorder,
    );

    assert_eq!(scheduler.run().unwrap(), Exit::Expired);
    assert_eq!(scheduler.state(), SchedulerState::Failed);
    assert_eq!(recorder.titles(), vec![EXPIRED_TITLE]);
    assert!(!scheduler.session().is_authenticated());
    assert_eq!(scheduler.poll_clock().last_fired, 0);
}

#[test]
fn test_unexpected_page_fails_without_notification() {
    let time = FakeTime::at(1000);
    let recorder = Recorder::on(&time);
    let client = site(&both_kinds());
    let observer = client.clone();
    let mut scheduler = scheduler(client, WatchConfig::default(), &time, &recorder);

    observer.set_redirect(url("/noc/tickets/mine"), url("/maintenance"));

    let err = scheduler.run().unwrap_err();

    assert!(matches!(err, RuntimeError::UnexpectedPage(location) if location == url("/maintenance")));
    assert_eq!(scheduler.state(), SchedulerState::Failed);
    assert!(recorder.sent().is_empty());
}

#[test]
fn test_scrape_failure_ends_run() {
    let time = FakeTime::at(1000);
    let recorder = Recorder::on(&time);
    let client = site(&both_kinds());
    let mut scheduler = scheduler(
        client,
        WatchConfig::default().with_detail_level(DetailLevel::NewOnly),
        &time,
        &recorder,
    );

    let err = scheduler.run().unwrap_err();

    assert!(matches!(err, RuntimeError::Scrape(_)));
    assert!(recorder.sent().is_empty());
}

#[test]
fn test_run_until_interrupted() {
    let time = FakeTime::at(1000).stop_after(3);
    let recorder = Recorder::on(&time);
    let mut scheduler = scheduler(
        site(&[row("ticket due", "2", "Server down")]),
        WatchConfig::default(),
        &time,
        &recorder,
    );

    assert_eq!(scheduler.run().unwrap(), Exit::Interrupted);

    // Polls at 1000 and 1062, then the fourth sleep is cut short.
    assert_eq!(recorder.titles(), vec!["New tickets", "New tickets"]);
    assert_eq!(scheduler.state(), SchedulerState::Sleeping);
}

#[test]
fn test_extra_channel_checked_last() {
    let time = FakeTime::at(1000);
    let recorder = Recorder::on(&time);
    let mut scheduler = scheduler(site(&both_kinds()), WatchConfig::default(), &time, &recorder)
        .with_channel(NotifyChannel::new(
            "urgent",
            "Still waiting",
            TicketSet::New,
            Duration::from_secs(30),
        ));

    let Step::Polled(report) = scheduler.step().unwrap() else {
        panic!("expected a poll");
    };

    assert_eq!(report.fired, vec!["new-tickets", "old-tickets", "urgent"]);
    assert_eq!(scheduler.channels().len(), 3);
    assert_eq!(time.sleeps(), vec![Duration::from_secs(10), Duration::from_secs(10)]);
}

//! Booking and reminder flows against the wired context

mod support;

use chrono::{Duration, Utc};
use medibook_domain::{AppointmentStatus, BookingRequest, MedibookError};
use support::{register_patient, test_context};

fn slot(doctor_id: &str, date: &str, time: &str) -> BookingRequest {
    BookingRequest { doctor_id: doctor_id.into(), date: date.into(), time: time.into() }
}

#[tokio::test(flavor = "multi_thread")]
async fn conflicting_approvals_resolve_to_one_winner() {
    let (ctx, _guard) = test_context();

    let p = register_patient(&ctx, "p@example.com", "Patient P").await;
    let q = register_patient(&ctx, "q@example.com", "Patient Q").await;

    // both patients book the same slot; booking never checks conflicts
    let a = ctx.booking.book(&p.id, slot("doc-1", "2024-01-01", "10:00")).await.unwrap();
    let b = ctx.booking.book(&q.id, slot("doc-1", "2024-01-01", "10:00")).await.unwrap();
    assert_eq!(a.status, AppointmentStatus::Pending);
    assert_eq!(b.status, AppointmentStatus::Pending);

    let approved = ctx.booking.approve(&a.id).await.unwrap();
    assert_eq!(approved.status, AppointmentStatus::Approved);

    let err = ctx.booking.approve(&b.id).await.unwrap_err();
    assert!(matches!(err, MedibookError::Conflict(_)));

    // the loser stays pending in the doctor's queue
    let queue = ctx.booking.pending_for_doctor("doc-1").await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, b.id);
}

#[tokio::test(flavor = "multi_thread")]
async fn booking_with_missing_field_is_rejected() {
    let (ctx, _guard) = test_context();
    let p = register_patient(&ctx, "p@example.com", "Patient P").await;

    let err = ctx.booking.book(&p.id, slot("doc-1", "", "10:00")).await.unwrap_err();
    assert!(matches!(err, MedibookError::InvalidInput(_)));

    assert!(ctx.booking.appointments_for_patient(&p.id, None).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn patient_listing_is_newest_first_with_limit() {
    let (ctx, _guard) = test_context();
    let p = register_patient(&ctx, "p@example.com", "Patient P").await;

    ctx.booking.book(&p.id, slot("doc-1", "2024-01-01", "10:00")).await.unwrap();
    ctx.booking.book(&p.id, slot("doc-1", "2024-01-02", "11:00")).await.unwrap();

    let all = ctx.booking.appointments_for_patient(&p.id, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let compact = ctx.booking.appointments_for_patient(&p.id, Some(1)).await.unwrap();
    assert_eq!(compact.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn reminder_pass_sends_once_per_appointment() {
    let (ctx, _guard) = test_context();
    let p = register_patient(&ctx, "p@example.com", "Patient P").await;

    // a slot ten minutes out, inside the 15-minute window
    let when = Utc::now() + Duration::minutes(10);
    let request = slot("doc-1", &when.format("%Y-%m-%d").to_string(), &when.format("%H:%M").to_string());
    let appointment = ctx.booking.book(&p.id, request).await.unwrap();
    ctx.booking.approve(&appointment.id).await.unwrap();

    let now = Utc::now().timestamp();
    let first = ctx.reminders.run_once(now).await.unwrap();
    let second = ctx.reminders.run_once(now).await.unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn pending_appointments_are_not_reminded() {
    let (ctx, _guard) = test_context();
    let p = register_patient(&ctx, "p@example.com", "Patient P").await;

    let when = Utc::now() + Duration::minutes(10);
    let request = slot("doc-1", &when.format("%Y-%m-%d").to_string(), &when.format("%H:%M").to_string());
    ctx.booking.book(&p.id, request).await.unwrap();

    let processed = ctx.reminders.run_once(Utc::now().timestamp()).await.unwrap();
    assert_eq!(processed, 0);
}

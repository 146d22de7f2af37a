use anyhow::Result;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use roadready::core::services::CustomerService;
use roadready::domain::dto::{
    BookingRequest, CarSearch, IssueRequest, MaintenanceRequestPayload, ReviewRequest,
};
use roadready::{ApiClient, RoadReadyError};
use serde_json::json;
use std::time::Duration;

fn service(server: &MockServer) -> Result<CustomerService> {
    let api = ApiClient::new(&server.url("/api/"), Duration::from_secs(5))?;
    Ok(CustomerService::new(api))
}

#[tokio::test]
async fn test_get_brands_prefers_car_brands() -> Result<()> {
    let server = MockServer::start();
    let primary = server.mock(|when, then| {
        when.method(GET).path("/api/CarBrands");
        then.status(200)
            .json_body(json!([{"brandId": 1, "brandName": "Ford"}]));
    });
    let fallback = server.mock(|when, then| {
        when.method(GET).path("/api/Brands");
        then.status(200).json_body(json!([]));
    });

    let body = service(&server)?.get_brands().await?;

    primary.assert();
    assert_eq!(fallback.hits(), 0);
    assert_eq!(body[0]["brandName"], "Ford");
    Ok(())
}

#[tokio::test]
async fn test_get_brands_falls_back_to_brands() -> Result<()> {
    let server = MockServer::start();
    let primary = server.mock(|when, then| {
        when.method(GET).path("/api/CarBrands");
        then.status(404);
    });
    let fallback = server.mock(|when, then| {
        when.method(GET).path("/api/Brands");
        then.status(200)
            .json_body(json!([{"brandId": 2, "brandName": "Toyota"}]));
    });

    let body = service(&server)?.get_brands().await?;

    primary.assert();
    fallback.assert();
    assert_eq!(body[0]["brandName"], "Toyota");
    Ok(())
}

#[tokio::test]
async fn test_search_cars_falls_back_with_same_body() -> Result<()> {
    let server = MockServer::start();
    let search = CarSearch {
        from_utc: "2025-01-01T10:00:00.000Z".to_string(),
        to_utc: "2025-01-03T10:00:00.000Z".to_string(),
        brand_id: Some(1),
        min_seats: Some(4),
        ..Default::default()
    };
    let expected = json!({
        "fromUtc": "2025-01-01T10:00:00.000Z",
        "toUtc": "2025-01-03T10:00:00.000Z",
        "brandId": 1,
        "minSeats": 4
    });

    let primary = server.mock(|when, then| {
        when.method(POST)
            .path("/api/Cars/search")
            .json_body(expected.clone());
        then.status(400).json_body(json!({"message": "not supported"}));
    });
    let fallback = server.mock(|when, then| {
        when.method(POST)
            .path("/api/Cars/search-availability")
            .json_body(expected.clone());
        then.status(200).json_body(json!([{"carId": 7}]));
    });

    let body = service(&server)?.search_cars(&search).await?;

    primary.assert();
    fallback.assert();
    assert_eq!(body[0]["carId"], 7);
    Ok(())
}

#[tokio::test]
async fn test_get_my_bookings_uses_mine_then_my() -> Result<()> {
    let server = MockServer::start();
    let mine = server.mock(|when, then| {
        when.method(GET).path("/api/Bookings/mine");
        then.status(404);
    });
    let my = server.mock(|when, then| {
        when.method(GET).path("/api/Bookings/my");
        then.status(200).json_body(json!([{"bookingId": 10}]));
    });

    let body = service(&server)?.get_my_bookings().await?;

    mine.assert();
    my.assert();
    assert_eq!(body[0]["bookingId"], 10);
    Ok(())
}

#[tokio::test]
async fn test_cancel_booking_succeeds_via_status_patch() -> Result<()> {
    let server = MockServer::start();
    let status = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/Bookings/123/status")
            .json_body(json!({"status": "Cancelled"}));
        then.status(200).json_body(json!({"ok": true}));
    });
    let other = server.mock(|when, then| {
        when.path("/api/Bookings/123/cancel");
        then.status(200);
    });

    let body = service(&server)?.cancel_booking(123).await?;

    status.assert();
    assert_eq!(other.hits(), 0);
    assert_eq!(body["ok"], true);
    Ok(())
}

#[tokio::test]
async fn test_cancel_booking_falls_back_to_post_cancel() -> Result<()> {
    let server = MockServer::start();
    let status = server.mock(|when, then| {
        when.method(PATCH).path("/api/Bookings/55/status");
        then.status(405);
    });
    let patch_cancel = server.mock(|when, then| {
        when.method(PATCH).path("/api/Bookings/55/cancel");
        then.status(404);
    });
    let post_cancel = server.mock(|when, then| {
        when.method(POST).path("/api/Bookings/55/cancel");
        then.status(200).json_body(json!({"cancelled": true}));
    });

    let body = service(&server)?.cancel_booking(55).await?;

    status.assert();
    patch_cancel.assert();
    post_cancel.assert();
    assert_eq!(body["cancelled"], true);
    Ok(())
}

#[tokio::test]
async fn test_cancel_booking_reports_last_status_when_all_fail() -> Result<()> {
    let server = MockServer::start();
    let status = server.mock(|when, then| {
        when.method(PATCH).path("/api/Bookings/9/status");
        then.status(500);
    });
    let patch_cancel = server.mock(|when, then| {
        when.method(PATCH).path("/api/Bookings/9/cancel");
        then.status(404);
    });
    let post_cancel = server.mock(|when, then| {
        when.method(POST).path("/api/Bookings/9/cancel");
        then.status(400);
    });

    let err = service(&server)?.cancel_booking(9).await.unwrap_err();

    status.assert();
    patch_cancel.assert();
    post_cancel.assert();
    assert_eq!(err.to_string(), "Cancel failed");
    assert!(matches!(err, RoadReadyError::CancelFailed { status: Some(400) }));
    assert_eq!(err.status(), Some(400));
    Ok(())
}

#[tokio::test]
async fn test_get_quote_posts_car_and_window() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/Bookings/quote").json_body(json!({
            "carId": 1,
            "fromUtc": "2025-01-01T10:00:00Z",
            "toUtc": "2025-01-03T10:00:00Z"
        }));
        then.status(200).json_body(json!({"total": 123}));
    });

    let body = service(&server)?
        .get_quote(1, "2025-01-01T10:00:00Z", "2025-01-03T10:00:00Z")
        .await?;

    mock.assert();
    assert_eq!(body["total"], 123);
    Ok(())
}

#[tokio::test]
async fn test_create_booking_posts_payload() -> Result<()> {
    let server = MockServer::start();
    let payload = BookingRequest {
        car_id: 1,
        pickup_date_time_utc: "2025-01-01T10:00:00.000Z".to_string(),
        dropoff_date_time_utc: "2025-01-03T10:00:00.000Z".to_string(),
        pickup_location_id: 2,
        dropoff_location_id: 3,
    };
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/Bookings").json_body(json!({
            "carId": 1,
            "pickupDateTimeUtc": "2025-01-01T10:00:00.000Z",
            "dropoffDateTimeUtc": "2025-01-03T10:00:00.000Z",
            "pickupLocationId": 2,
            "dropoffLocationId": 3
        }));
        then.status(201).json_body(json!({"bookingId": 99}));
    });

    let body = service(&server)?.create_booking(&payload).await?;

    mock.assert();
    assert_eq!(body["bookingId"], 99);
    Ok(())
}

#[tokio::test]
async fn test_issue_endpoints() -> Result<()> {
    let server = MockServer::start();
    let mine = server.mock(|when, then| {
        when.method(GET).path("/api/BookingIssues/mine");
        then.status(404);
    });
    let my = server.mock(|when, then| {
        when.method(GET).path("/api/BookingIssues/my");
        then.status(200).json_body(json!([{"id": 1}]));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/api/BookingIssues").json_body(json!({
            "bookingId": 7,
            "issueType": "Vehicle",
            "description": "Noise"
        }));
        then.status(201).json_body(json!({"id": 22}));
    });
    let by_booking = server.mock(|when, then| {
        when.method(GET).path("/api/BookingIssues/booking/3");
        then.status(200).json_body(json!([]));
    });
    let status = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/BookingIssues/5/status")
            .json_body(json!({"status": "Resolved"}));
        then.status(200).json_body(json!({"ok": true}));
    });

    let customer = service(&server)?;
    assert_eq!(customer.get_my_issues().await?[0]["id"], 1);
    let created = customer
        .create_issue(&IssueRequest {
            booking_id: 7,
            issue_type: "Vehicle".to_string(),
            description: "Noise".to_string(),
        })
        .await?;
    assert_eq!(created["id"], 22);
    customer.get_booking_issues(3).await?;
    assert_eq!(customer.update_issue_status(5, "Resolved").await?["ok"], true);

    mine.assert();
    my.assert();
    create.assert();
    by_booking.assert();
    status.assert();
    Ok(())
}

#[tokio::test]
async fn test_review_endpoints() -> Result<()> {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST).path("/api/Reviews").json_body(json!({
            "bookingId": 77,
            "rating": 5,
            "comment": "Great!"
        }));
        then.status(201)
            .json_body(json!({"id": 1, "bookingId": 77, "rating": 5}));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/Reviews/car/4");
        then.status(200).json_body(json!([]));
    });
    let avg = server.mock(|when, then| {
        when.method(GET).path("/api/Reviews/car/4/avg");
        then.status(200).json_body(json!({"average": 4.5}));
    });

    let customer = service(&server)?;
    let review = ReviewRequest {
        booking_id: 77,
        rating: 5,
        comment: "Great!".to_string(),
    };
    assert_eq!(customer.create_review(&review).await?["rating"], 5);
    customer.get_car_reviews(4).await?;
    assert_eq!(customer.get_car_rating(4).await?["average"], 4.5);

    create.assert();
    list.assert();
    avg.assert();
    Ok(())
}

#[tokio::test]
async fn test_maintenance_endpoints() -> Result<()> {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/MaintenanceRequests")
            .json_body(json!({"carId": 2, "issueDescription": "Oil leak"}));
        then.status(201).json_body(json!({"requestId": 10}));
    });
    let open = server.mock(|when, then| {
        when.method(GET).path("/api/MaintenanceRequests/open");
        then.status(200).json_body(json!([]));
    });
    let for_car = server.mock(|when, then| {
        when.method(GET).path("/api/MaintenanceRequests/car/9");
        then.status(200).json_body(json!([]));
    });
    let mine = server.mock(|when, then| {
        when.method(GET).path("/api/MaintenanceRequests/mine");
        then.status(200).json_body(json!([]));
    });
    let resolve = server.mock(|when, then| {
        when.method(PATCH).path("/api/MaintenanceRequests/33/resolve");
        then.status(204);
    });

    let customer = service(&server)?;
    let created = customer
        .create_maintenance_request(&MaintenanceRequestPayload {
            car_id: 2,
            issue_description: "Oil leak".to_string(),
        })
        .await?;
    assert_eq!(created["requestId"], 10);
    customer.get_open_maintenance().await?;
    customer.get_maintenance_for_car(9).await?;
    customer.get_my_maintenance().await?;
    assert!(customer.resolve_maintenance(33).await?.is_null());

    create.assert();
    open.assert();
    for_car.assert();
    mine.assert();
    resolve.assert();
    Ok(())
}

#[tokio::test]
async fn test_cars_and_locations() -> Result<()> {
    let server = MockServer::start();
    let cars = server.mock(|when, then| {
        when.method(GET).path("/api/Cars");
        then.status(200).json_body(json!([]));
    });
    let locations = server.mock(|when, then| {
        when.method(GET).path("/api/Locations");
        then.status(200).json_body(json!([]));
    });

    let customer = service(&server)?;
    customer.get_cars().await?;
    customer.get_locations().await?;

    cars.assert();
    locations.assert();
    Ok(())
}

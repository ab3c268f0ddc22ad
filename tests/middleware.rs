use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use talent_crm::middleware::RedirectUnauthorized;

#[actix_web::test]
async fn redirects_unauthorized_to_signin() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::get().uri("/talents").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/signin"
    );
}

#[actix_web::test]
async fn other_statuses_pass_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .route("/ok", web::get().to(|| async { HttpResponse::Ok().finish() }))
            .route(
                "/forbidden",
                web::get().to(|| async { HttpResponse::Forbidden().finish() }),
            ),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/forbidden").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

//! End-to-end pipeline tests against a mock portal.

use harmonie::{process::fetch_bills, Credentials, Error, Portal};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/web/mon-compte/mes-remboursements";

fn login_page(server_uri: &str) -> String {
    format!(
        r#"<html><body>
        <form id="_58_fm" action="{server_uri}/c/portal/login" method="post">
            <input type="hidden" name="_58_redirect" value="/web/mon-compte" />
            <input type="text" name="_58_login" value="" />
            <input type="password" name="_58_password" value="" />
        </form>
        </body></html>"#
    )
}

const ACCOUNT_PAGE: &str = "<html><body>Bonjour Jeanne</body></html>";

const LISTING_PAGE: &str = r#"<html><body><table>
    <tr><td><img class="loupe" onclick="javascript:detailPaiement('1','P202103050017');" /></td></tr>
    <tr><td><img class="loupe" onclick="javascript:detailPaiement('2','P202104120023');" /></td></tr>
    <tr><td><img class="loupe" /></td></tr>
</table></body></html>"#;

fn credentials() -> Credentials {
    Credentials {
        login: "jeanne".into(),
        password: "s3cret".into(),
    }
}

/// Mounts the portal root and a login endpoint that checks the submitted
/// form fields, then the listing page.
async fn mount_login_and_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page(&server.uri())))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/c/portal/login"))
        .and(body_string_contains("_58_login=jeanne"))
        .and(body_string_contains("_58_password=s3cret"))
        .and(body_string_contains("_58_redirect=%2Fweb%2Fmon-compte"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=abc123; Path=/")
                .set_body_string(ACCOUNT_PAGE),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .mount(server)
        .await;
}

/// Mounts a detail endpoint for one payment, matching the full portlet
/// routing parameters. Higher priority than the bare listing mock, which
/// shares the same path.
async fn mount_detail(server: &MockServer, counter: &str, num_paiement: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param(
            "p_p_id",
            "mhmRemboursement_WAR_mhmportalapplication",
        ))
        .and(query_param("p_p_lifecycle", "2"))
        .and(query_param("p_p_state", "normal"))
        .and(query_param("p_p_mode", "view"))
        .and(query_param("p_p_cacheability", "cacheLevelPage"))
        .and(query_param("p_p_col_id", "column-2"))
        .and(query_param("p_p_col_pos", "1"))
        .and(query_param("p_p_col_count", "3"))
        .and(query_param(
            "_mhmRemboursement_WAR_mhmportalapplication_action",
            "detailPaiement",
        ))
        .and(query_param("counter", counter))
        .and(query_param("numPaiement", num_paiement))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .with_priority(1)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetches_one_bill_per_reimbursement_line_item() {
    let server = MockServer::start().await;
    mount_login_and_listing(&server).await;
    mount_detail(
        &server,
        "1",
        "P202103050017",
        r#"{"decompteList": [
            {"labelActe": "Consultation", "montantRC": "12,50", "dateSoin": "05/03/2021"},
            {"labelActe": "Pharmacie", "montantRC": "3,14", "dateSoin": "06/03/2021"}
        ]}"#,
    )
    .await;
    mount_detail(
        &server,
        "2",
        "P202104120023",
        r#"{"decompteList": [
            {"labelActe": "Radiologie", "montantRC": "40,00", "dateSoin": "12/04/2021"}
        ]}"#,
    )
    .await;

    let portal = Portal::with_base_url(&server.uri()).unwrap();
    let mut bills = fetch_bills(&portal, &credentials()).await.unwrap();

    // No ordering is guaranteed across payments.
    bills.sort_by(|a, b| (a.date, &a.subtype).cmp(&(b.date, &b.subtype)));

    assert_eq!(bills.len(), 3);
    assert_eq!(bills[0].doc_type, "health");
    assert_eq!(bills[0].subtype, "Consultation");
    assert_eq!(bills[0].vendor, "Harmonie");
    assert_eq!(bills[0].amount, 12.5);
    assert_eq!(bills[0].date.to_string(), "2021-03-05");
    assert_eq!(bills[1].subtype, "Pharmacie");
    assert_eq!(bills[2].subtype, "Radiologie");
    assert_eq!(bills[2].amount, 40.0);
}

#[tokio::test]
async fn an_empty_listing_yields_no_bills() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page(&server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/c/portal/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNT_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Aucun paiement</body></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let portal = Portal::with_base_url(&server.uri()).unwrap();
    let bills = fetch_bills(&portal, &credentials()).await.unwrap();
    assert!(bills.is_empty());
}

#[tokio::test]
async fn one_failing_detail_request_fails_the_whole_run() {
    let server = MockServer::start().await;
    mount_login_and_listing(&server).await;
    mount_detail(
        &server,
        "1",
        "P202103050017",
        r#"{"decompteList": [
            {"labelActe": "Consultation", "montantRC": "12,50", "dateSoin": "05/03/2021"}
        ]}"#,
    )
    .await;

    // The second payment's detail endpoint is down.
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("counter", "2"))
        .and(query_param("numPaiement", "P202104120023"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let portal = Portal::with_base_url(&server.uri()).unwrap();
    let err = fetch_bills(&portal, &credentials()).await.unwrap_err();
    assert!(matches!(err, Error::Reqwest(_)));
}

#[tokio::test]
async fn a_rejected_login_is_an_authentication_error() {
    let server = MockServer::start().await;

    let page = login_page(&server.uri());
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page.clone()))
        .mount(&server)
        .await;
    // Bad credentials: the portal serves the login form again.
    Mock::given(method("POST"))
        .and(path("/c/portal/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;
    // The run must stop before ever touching the listing page.
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let portal = Portal::with_base_url(&server.uri()).unwrap();
    let err = fetch_bills(&portal, &credentials()).await.unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed));
}

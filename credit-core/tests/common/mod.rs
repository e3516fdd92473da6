use std::path::{Path, PathBuf};

use credit_core::config::FormConfig;
use credit_core::models::{CreditApplication, default_application};
use rust_decimal_macros::dec;

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Fills every field the active steps validate, with both branches on and
/// New York among the exempt states.
pub fn complete_application(config: &FormConfig) -> CreditApplication {
    let mut app = default_application(config);

    app.company_name = "Hudson Valley Growers".to_string();
    app.address = "400 River St".to_string();
    app.city = "Troy".to_string();
    app.state = "NY".to_string();
    app.zip = "12180-1234".to_string();
    app.phone = "518.555.0142".to_string();
    app.email = "office@hvgrowers.example".to_string();
    app.ein = "14-1234567".to_string();
    let contact = &mut app.contacts_mut()[0];
    contact.name = "Morgan Diaz".to_string();
    contact.email = "morgan@hvgrowers.example".to_string();

    app.credit_amount = Some(dec!(15000.00));
    app.credit_disclosure_ack = true;
    let owner = &mut app.owners_mut()[0];
    owner.name = "Morgan Diaz".to_string();
    owner.title = "Owner".to_string();
    owner.ssn = "123-45-6789".to_string();
    if let Some(bank) = app.bank.as_mut() {
        bank.name = "Pioneer Savings".to_string();
        bank.account_no = "88-1200".to_string();
    }
    for (i, reference) in app.trade_refs.iter_mut().enumerate() {
        reference.name = format!("Supplier {}", i + 1);
        reference.email = Some(format!("ar{i}@supplier.example"));
    }

    app.set_exempt_states(["NY", "VT"]);
    app.set_resale_number("NY", "NY-44-1029")
        .expect("NY takes a resale number");
    if let Some(certificate) = app.resale_certificate.as_mut() {
        certificate.purchaser_name = Some("Hudson Valley Growers".to_string());
    }
    app.ny_st120.purchaser_name = "Hudson Valley Growers".to_string();
    app.ny_st120.purchaser_address = "400 River St, Troy NY".to_string();
    app.ny_st120.ny_registration = "NY-44-1029".to_string();
    app.ny_st120.vendor_name = "Admore".to_string();

    let signer = &mut app.signers_mut()[0];
    signer.name = "Morgan Diaz".to_string();
    signer.title = "Owner".to_string();
    signer.agree = true;
    signer.date = Some("2025-06-02T09:30:00Z".to_string());
    signer.signature_data_url = Some("data:image/png;base64,iVBORw0KGgo=".to_string());

    app
}

use airlink_core::db::open_db_in_memory;
use airlink_core::model::carrier::today;
use airlink_core::{
    AssociationService, CarrierPatch, CarrierService, FacilityPatch, FacilityService, NewCarrier,
    NewFacility, ServiceError, SqliteCarrierRepository, SqliteFacilityRepository,
};
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

fn new_carrier(name: &str) -> NewCarrier {
    NewCarrier {
        name: name.to_string(),
        description: format!("{name} description"),
        founded_on: NaiveDate::from_ymd_opt(1928, 1, 1).unwrap(),
        website: "https://example.com".to_string(),
    }
}

fn new_facility(code: &str) -> NewFacility {
    NewFacility {
        name: format!("{code} Airport"),
        code: code.to_string(),
        country: "Colombia".to_string(),
        city: "Bogotá".to_string(),
    }
}

#[test]
fn carrier_create_find_update_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = CarrierService::new(SqliteCarrierRepository::try_new(&conn).unwrap());

    let created = service.create(new_carrier("Avianca")).unwrap();
    assert_eq!(created.name, "Avianca");
    assert!(created.facilities.is_empty());
    assert_eq!(service.find_one(created.id).unwrap(), created);

    let updated = service
        .update(
            created.id,
            CarrierPatch {
                website: Some("https://www.avianca.com".to_string()),
                ..CarrierPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.website, "https://www.avianca.com");
    assert_eq!(updated.name, "Avianca");

    service.delete(created.id).unwrap();
    let err = service.find_one(created.id).unwrap_err();
    assert!(matches!(err, ServiceError::CarrierNotFound(id) if id == created.id));
}

#[test]
fn carrier_find_all_is_sorted_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = CarrierService::new(SqliteCarrierRepository::try_new(&conn).unwrap());

    service.create(new_carrier("lufthansa")).unwrap();
    service.create(new_carrier("Air France")).unwrap();

    let names: Vec<String> = service
        .find_all()
        .unwrap()
        .into_iter()
        .map(|carrier| carrier.name)
        .collect();
    assert_eq!(names, vec!["Air France", "lufthansa"]);
}

#[test]
fn carrier_rejects_future_founding_date_on_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let service = CarrierService::new(SqliteCarrierRepository::try_new(&conn).unwrap());
    let tomorrow = today() + Duration::days(1);

    let mut input = new_carrier("Future Air");
    input.founded_on = tomorrow;
    let err = service.create(input).unwrap_err();
    assert!(err.is_validation(), "{err}");
    assert!(service.find_all().unwrap().is_empty());

    let created = service.create(new_carrier("Present Air")).unwrap();
    let err = service
        .update(
            created.id,
            CarrierPatch {
                founded_on: Some(tomorrow),
                ..CarrierPatch::default()
            },
        )
        .unwrap_err();
    assert!(err.is_validation(), "{err}");
    assert_eq!(
        service.find_one(created.id).unwrap().founded_on,
        created.founded_on
    );
}

#[test]
fn carrier_rejects_invalid_website_and_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = CarrierService::new(SqliteCarrierRepository::try_new(&conn).unwrap());

    let mut input = new_carrier("Broken Air");
    input.website = "www.no-scheme".to_string();
    assert!(service.create(input).unwrap_err().is_validation());

    let mut input = new_carrier("Padded Air");
    input.website = " https://padded.example.com ".to_string();
    assert!(service.create(input).unwrap_err().is_validation());
    assert!(service.find_all().unwrap().is_empty());

    let created = service.create(new_carrier("Named Air")).unwrap();
    let err = service
        .update(
            created.id,
            CarrierPatch {
                name: Some("   ".to_string()),
                ..CarrierPatch::default()
            },
        )
        .unwrap_err();
    assert!(err.is_validation(), "{err}");
}

#[test]
fn carrier_field_update_keeps_membership() {
    let conn = open_db_in_memory().unwrap();
    let carrier_repo = SqliteCarrierRepository::try_new(&conn).unwrap();
    let facility_repo = SqliteFacilityRepository::try_new(&conn).unwrap();
    let carriers = CarrierService::new(&carrier_repo);
    let facilities = FacilityService::new(&facility_repo);
    let associations = AssociationService::new(&carrier_repo, &facility_repo);

    let carrier = carriers.create(new_carrier("LATAM")).unwrap();
    let bog = facilities.create(new_facility("BOG")).unwrap();
    associations.add_facility(carrier.id, bog.id).unwrap();

    let updated = carriers
        .update(
            carrier.id,
            CarrierPatch {
                description: Some("Chilean-Brazilian group".to_string()),
                ..CarrierPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.facility_ids(), vec![bog.id]);
}

#[test]
fn deleting_carrier_clears_facility_mirror() {
    let conn = open_db_in_memory().unwrap();
    let carrier_repo = SqliteCarrierRepository::try_new(&conn).unwrap();
    let facility_repo = SqliteFacilityRepository::try_new(&conn).unwrap();
    let carriers = CarrierService::new(&carrier_repo);
    let facilities = FacilityService::new(&facility_repo);
    let associations = AssociationService::new(&carrier_repo, &facility_repo);

    let carrier = carriers.create(new_carrier("Copa")).unwrap();
    let pty = facilities.create(new_facility("PTY")).unwrap();
    associations.add_facility(carrier.id, pty.id).unwrap();
    assert_eq!(facilities.find_one(pty.id).unwrap().carrier_ids, vec![carrier.id]);

    carriers.delete(carrier.id).unwrap();
    assert!(facilities.find_one(pty.id).unwrap().carrier_ids.is_empty());
}

#[test]
fn facility_create_find_update_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = FacilityService::new(SqliteFacilityRepository::try_new(&conn).unwrap());

    let created = service.create(new_facility("BOG")).unwrap();
    assert_eq!(created.code, "BOG");
    assert!(created.carrier_ids.is_empty());

    let updated = service
        .update(
            created.id,
            FacilityPatch {
                name: Some("El Dorado".to_string()),
                ..FacilityPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "El Dorado");
    assert_eq!(updated.code, "BOG");
    assert_eq!(service.find_all().unwrap().len(), 1);

    service.delete(created.id).unwrap();
    assert!(service.find_one(created.id).unwrap_err().is_not_found());
}

#[test]
fn facility_code_must_be_three_characters() {
    let conn = open_db_in_memory().unwrap();
    let service = FacilityService::new(SqliteFacilityRepository::try_new(&conn).unwrap());

    let err = service.create(new_facility("BOGO")).unwrap_err();
    assert!(err.is_validation(), "{err}");
    assert!(err.to_string().contains("exactly 3 characters"));

    let created = service.create(new_facility("MDE")).unwrap();
    let err = service
        .update(
            created.id,
            FacilityPatch {
                code: Some("MD".to_string()),
                ..FacilityPatch::default()
            },
        )
        .unwrap_err();
    assert!(err.is_validation(), "{err}");
    assert_eq!(service.find_one(created.id).unwrap().code, "MDE");
}

#[test]
fn unknown_ids_are_not_found_for_update_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let carriers = CarrierService::new(SqliteCarrierRepository::try_new(&conn).unwrap());
    let facilities = FacilityService::new(SqliteFacilityRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    assert!(matches!(
        carriers.update(missing, CarrierPatch::default()).unwrap_err(),
        ServiceError::CarrierNotFound(id) if id == missing
    ));
    assert!(carriers.delete(missing).unwrap_err().is_not_found());
    assert!(matches!(
        facilities.update(missing, FacilityPatch::default()).unwrap_err(),
        ServiceError::FacilityNotFound(id) if id == missing
    ));
    assert!(facilities.delete(missing).unwrap_err().is_not_found());
}

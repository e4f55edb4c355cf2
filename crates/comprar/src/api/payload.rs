//! Generated account payloads.
//!
//! Every generated [`User`] carries a unique e-mail (uuid-derived), so
//! parallel account tests never collide on fixture state.

use rand::Rng;
use serde::{Deserialize, Serialize};

const FIRST_NAMES: &[&str] = &[
    "Jacek", "Maria", "Piotr", "Anna", "Tomasz", "Ewa", "Marek", "Kasia",
];
const LAST_NAMES: &[&str] = &[
    "Kowalski", "Nowak", "Wiśniewski", "Wójcik", "Kamińska", "Lewandowski",
];
const COMPANIES: &[&str] = &["Comprar Labs", "Tienda Sp. z o.o.", "QA Works", "Shopfront Testing"];
const CITIES: &[&str] = &["Warszawa", "Kraków", "Gdańsk", "Wrocław", "Poznań"];
const STREETS: &[&str] = &[
    "ul. Długa", "ul. Polna", "ul. Leśna", "al. Jerozolimskie", "ul. Słoneczna",
];
const TITLES: &[&str] = &["Mr", "Mrs", "Miss"];

/// Generated account fields for the create/update account endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name (also used as firstname)
    pub name: String,
    /// Unique e-mail
    pub email: String,
    /// Password
    pub password: String,
    /// Salutation
    pub title: String,
    /// Day of birth
    pub birth_date: u32,
    /// Month of birth
    pub birth_month: u32,
    /// Year of birth
    pub birth_year: u32,
    /// First name
    pub firstname: String,
    /// Last name
    pub lastname: String,
    /// Company
    pub company: String,
    /// Address line 1
    pub address1: String,
    /// Address line 2 (line 1 plus a unit suffix)
    pub address2: String,
    /// Country
    pub country: String,
    /// Postal code
    pub zipcode: String,
    /// Region (the API takes the city here too)
    pub state: String,
    /// City
    pub city: String,
    /// Phone number
    pub mobile_number: String,
}

impl User {
    /// Generate a fresh account payload with a unique e-mail
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();

        let name = pick(&mut rng, FIRST_NAMES);
        let unique = uuid::Uuid::new_v4().simple().to_string();
        let email = format!("{}.{}@example.test", name.to_lowercase(), &unique[..12]);
        let street = pick(&mut rng, STREETS);
        let address1 = format!("{street} {}", rng.gen_range(1..200));
        let address2 = format!("{address1} / {}", rng.gen_range(1..=50));
        let city = pick(&mut rng, CITIES);

        Self {
            name: name.clone(),
            email,
            password: format!("Pw!{}", &unique[12..24]),
            title: pick(&mut rng, TITLES),
            birth_date: rng.gen_range(1..=28),
            birth_month: rng.gen_range(1..=12),
            birth_year: rng.gen_range(1954..=2006),
            firstname: name,
            lastname: pick(&mut rng, LAST_NAMES),
            company: pick(&mut rng, COMPANIES),
            address1,
            address2,
            country: "Poland".to_string(),
            zipcode: format!("{:02}-{:03}", rng.gen_range(0..100), rng.gen_range(0..1000)),
            state: city.clone(),
            city,
            mobile_number: format!("+48 {}", rng.gen_range(500_000_000..800_000_000u64)),
        }
    }

    /// Login credentials for this account
    #[must_use]
    pub fn credentials(&self) -> (&str, &str) {
        (&self.email, &self.password)
    }

    /// Form-encoded pairs for the account endpoints
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name.clone()),
            ("email".to_string(), self.email.clone()),
            ("password".to_string(), self.password.clone()),
            ("title".to_string(), self.title.clone()),
            ("birth_date".to_string(), self.birth_date.to_string()),
            ("birth_month".to_string(), self.birth_month.to_string()),
            ("birth_year".to_string(), self.birth_year.to_string()),
            ("firstname".to_string(), self.firstname.clone()),
            ("lastname".to_string(), self.lastname.clone()),
            ("company".to_string(), self.company.clone()),
            ("address1".to_string(), self.address1.clone()),
            ("address2".to_string(), self.address2.clone()),
            ("country".to_string(), self.country.clone()),
            ("zipcode".to_string(), self.zipcode.clone()),
            ("state".to_string(), self.state.clone()),
            ("city".to_string(), self.city.clone()),
            ("mobile_number".to_string(), self.mobile_number.clone()),
        ]
    }
}

fn pick(rng: &mut impl Rng, list: &[&str]) -> String {
    list[rng.gen_range(0..list.len())].to_string()
}

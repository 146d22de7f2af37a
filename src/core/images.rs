use crate::domain::model::Car;
use regex::Regex;
use std::sync::OnceLock;

pub const FALLBACK_IMG: &str = "/images/cars/logo.png";

fn image_extension() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(png|jpe?g|webp|gif)$").expect("static regex"))
}

fn bad_hosts() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        vec![
            Regex::new(r"(?i)cdn\.example\.com").expect("static regex"),
            Regex::new(r"(?i)placeholder").expect("static regex"),
        ]
    })
}

/// Bundled picture for well-known brand/model combinations.
pub fn local_image_for(car: &Car) -> &'static str {
    let brand = car.brand_name.to_lowercase();
    let model = car.model.to_lowercase();

    if brand.contains("toyota") && model.contains("corolla") {
        return "/images/cars/toyota-corolla.png";
    }
    if brand.contains("ford") {
        return "/images/cars/Ford-3.png";
    }
    if brand.contains("honda") && (model.contains("city") || model.contains("civic")) {
        return "/images/cars/Honda1.png";
    }
    if brand.contains("honda") {
        return "/images/cars/honda2.png";
    }
    FALLBACK_IMG
}

/// The API image when it looks like a real picture, otherwise a local one.
pub fn src_for_car(car: &Car) -> String {
    let raw = car.image_url.trim();
    if raw.is_empty()
        || bad_hosts().iter().any(|re| re.is_match(raw))
        || !image_extension().is_match(raw)
    {
        return local_image_for(car).to_string();
    }
    raw.to_string()
}

pub fn car_alt(car: &Car) -> String {
    let alt = format!("{} {}", car.brand_name.trim(), car.model.trim());
    let alt = alt.trim();
    if alt.is_empty() {
        "Car".to_string()
    } else {
        alt.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(brand: &str, model: &str, image: &str) -> Car {
        Car {
            brand_name: brand.to_string(),
            model: model.to_string(),
            image_url: image.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_real_image_url_is_kept() {
        let c = car("Kia", "Rio", " https://img.test/rio.JPG ");
        assert_eq!(src_for_car(&c), "https://img.test/rio.JPG");
    }

    #[test]
    fn test_placeholder_hosts_and_non_images_fall_back() {
        assert_eq!(
            src_for_car(&car("Toyota", "Corolla", "https://cdn.example.com/x.png")),
            "/images/cars/toyota-corolla.png"
        );
        assert_eq!(
            src_for_car(&car("Honda", "Civic", "https://img.test/page.html")),
            "/images/cars/Honda1.png"
        );
        assert_eq!(src_for_car(&car("Honda", "Jazz", "")), "/images/cars/honda2.png");
        assert_eq!(src_for_car(&car("Ford", "Focus", "")), "/images/cars/Ford-3.png");
        assert_eq!(src_for_car(&car("Kia", "Rio", "")), FALLBACK_IMG);
    }

    #[test]
    fn test_car_alt() {
        assert_eq!(car_alt(&car(" Kia ", "Rio", "")), "Kia Rio");
        assert_eq!(car_alt(&car("", "", "")), "Car");
    }
}

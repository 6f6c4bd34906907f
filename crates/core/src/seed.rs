//! Built-in sample projects.
//!
//! The gallery falls back to this fixture when the project store is
//! unreachable or holds no displayable project, so a fresh install or a
//! broken connection still shows a populated gallery. The content is
//! fixed: same ids, same order, same fields on every call.

use chrono::{NaiveDate, NaiveTime};

use crate::category::Category;
use crate::project::Project;
use crate::types::DbId;

struct Seed {
    id: DbId,
    title: &'static str,
    category: Category,
    description: &'static str,
    images: &'static [&'static str],
    client: &'static str,
    date: (i32, u32, u32),
    materials: &'static [&'static str],
}

const SEEDS: &[Seed] = &[
    Seed {
        id: 1,
        title: "Cocina Integral Moderna",
        category: Category::Kitchen,
        description: "Diseño moderno con isla central y electrodomésticos integrados",
        images: &["/images/cocina-1.jpg", "/images/cocina-1-2.jpg"],
        client: "Familia Rodriguez",
        date: (2024, 1, 15),
        materials: &["Melamina", "Granito", "Acero inoxidable"],
    },
    Seed {
        id: 2,
        title: "Placard Empotrado",
        category: Category::Bedroom,
        description: "Placard de tres cuerpos con espejos y cajones internos",
        images: &["/images/placard-1.jpg"],
        client: "Juan Pérez",
        date: (2024, 2, 10),
        materials: &["MDF", "Espejo", "Herrajes alemanes"],
    },
    Seed {
        id: 3,
        title: "Biblioteca de Roble",
        category: Category::LivingRoom,
        description: "Biblioteca artesanal en madera de roble con detalles tallados",
        images: &["/images/biblioteca-1.jpg"],
        client: "María González",
        date: (2024, 1, 28),
        materials: &["Roble macizo", "Laca poliuretánica"],
    },
    Seed {
        id: 4,
        title: "Escritorio Ejecutivo",
        category: Category::Office,
        description: "Escritorio en L con cajoneras y espacio para computadora",
        images: &["/images/escritorio-1.jpg"],
        client: "Estudio Jurídico López",
        date: (2024, 3, 5),
        materials: &["Nogal", "Cuero", "Herrajes bronce"],
    },
    Seed {
        id: 5,
        title: "Mueble de Baño Flotante",
        category: Category::Bathroom,
        description: "Vanitory suspendido con espejo y estantes laterales",
        images: &["/images/bano-1.jpg"],
        client: "Apartamento Centro",
        date: (2024, 2, 20),
        materials: &["MDF hidrófugo", "Mesada Silestone"],
    },
    Seed {
        id: 6,
        title: "Mesa de Comedor Familiar",
        category: Category::LivingRoom,
        description: "Mesa extensible para 8 personas en madera maciza",
        images: &["/images/mesa-1.jpg", "/images/mesa-1-2.jpg"],
        client: "Familia Martínez",
        date: (2024, 1, 12),
        materials: &["Paraíso", "Herrajes de extensión"],
    },
];

/// The fallback dataset, in fixture order (ids 1 through 6).
///
/// `created_at`/`updated_at` are midnight UTC of the project date.
pub fn fallback_projects() -> Vec<Project> {
    SEEDS
        .iter()
        .map(|seed| {
            let (y, m, d) = seed.date;
            let date = NaiveDate::from_ymd_opt(y, m, d).expect("seed dates are valid");
            let stamp = date.and_time(NaiveTime::default()).and_utc();
            Project {
                id: seed.id,
                title: seed.title.to_string(),
                category: seed.category,
                description: seed.description.to_string(),
                client: seed.client.to_string(),
                date,
                materials: seed.materials.iter().map(|m| m.to_string()).collect(),
                images: seed.images.iter().map(|i| i.to_string()).collect(),
                created_at: stamp,
                updated_at: stamp,
            }
        })
        .collect()
}

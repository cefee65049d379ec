//! Demo catalogue loaded into an empty `plants` collection

use crate::domain::{PlantDetails, SeasonName};

/// Owner recorded on the demo records.
pub const DEMO_AUTHOR_ID: &str = "admin-demo-1";
pub const DEMO_AUTHOR_NAME: &str = "Admin User";

/// `(id, details)` pairs for the five demo biographies.
pub fn demo_plants() -> Vec<(&'static str, PlantDetails)> {
    vec![
        (
            "PLANT-001",
            PlantDetails {
                family: "Haemodoraceae".into(),
                botanical_name: "Anigozanthos manglesii".into(),
                common_name: "Kangaroo Paw".into(),
                habit_growth_characteristics: "Perennial herb with upright flowering stems".into(),
                life_cycle: "Perennial".into(),
                identifying_characteristics: "Distinctive tubular flowers resembling a kangaroo paw".into(),
                leaves_stems_memristems: "Leaves: Linear, sword-shaped\nStem: Unbranched flowering stems\nMeristems: Apical for flowers, basal for leaf growth".into(),
                flowers: "Tubular red and green flowers covered in fine hairs".into(),
                flowering_time_season: "Poorneet (September - October)".into(),
                fruit_seed: "Capsule containing black seeds".into(),
                seed_collection_time_season: "Buarth Gurru (November)".into(),
                additional_propagation_requirements: "Division of rhizomes or seed propagation".into(),
                trunk: "No woody trunk".into(),
                root_system: "Fibrous roots with rhizomes".into(),
                vascular_system: "Monocot vascular bundles".into(),
                additional_information: "Western Australia's floral emblem".into(),
                spotting_characteristics: "Bright red flowers in spring".into(),
                family_level: "Haemodoraceae".into(),
                cultural_information_and_uses: "Used in Aboriginal seasonal knowledge".into(),
                references: "FloraBase WA".into(),
                horticultural_landscape_info: "Full sun, well-drained soil".into(),
                ethnobotanical_information_uses: "Cultural seasonal indicator".into(),
                indigenous_season: SeasonName::Poorneet,
                images: vec!["/assets/kangaroo-paw.jpg".into()],
            },
        ),
        (
            "PLANT-002",
            PlantDetails {
                family: "Proteaceae".into(),
                botanical_name: "Telopea speciosissima".into(),
                common_name: "Waratah".into(),
                leaves_stems_memristems: "Leaves: Oblong to lanceolate, dark green, leathery, 10–20cm long\nStem: Woody, upright, branching\nMeristems: Terminal meristems produce large flower heads".into(),
                flowers: "Large red dome-shaped head, 10–15cm diameter, surrounded by red bracts".into(),
                flowering_time_season: "Guling to Poorneet (August - October)".into(),
                fruit_seed: "Woody follicle containing winged seeds".into(),
                seed_collection_time_season: "Garrawang to Biderap (December - February)".into(),
                additional_propagation_requirements: "Cuttings from semi-hardwood in autumn, grafting onto hardy rootstock recommended".into(),
                trunk: "Multi-stemmed shrub, woody at base".into(),
                root_system: "Deep taproot with lateral roots".into(),
                vascular_system: "Ring of vascular bundles in stem (dicot)".into(),
                additional_information: "New South Wales floral emblem. Spectacular spring display. Prefers acidic, well-drained soil and part shade.".into(),
                indigenous_season: SeasonName::Guling,
                images: vec!["https://images.unsplash.com/photo-1490750967868-88aa4486c946?w=800".into()],
                ..Default::default()
            },
        ),
        (
            "PLANT-003",
            PlantDetails {
                family: "Fabaceae".into(),
                botanical_name: "Acacia dealbata".into(),
                common_name: "Silver Wattle".into(),
                leaves_stems_memristems: "Leaves: Bipinnate, feathery, silver-grey, compound with small leaflets\nStem: Smooth, grey-green when young, becoming fissured with age\nMeristems: Lateral and terminal meristems produce numerous flower clusters".into(),
                flowers: "Globular bright yellow flower heads in large sprays".into(),
                flowering_time_season: "Waring to Guling (June - August)".into(),
                fruit_seed: "Flat brown pods, 4–10cm long".into(),
                seed_collection_time_season: "Poorneet to Buarth Gurru (October - November)".into(),
                additional_propagation_requirements: "Scarified seeds sown in spring, can also use cuttings".into(),
                trunk: "Single or multi-trunked, can reach 20–30m height".into(),
                root_system: "Extensive root system, nitrogen-fixing nodules".into(),
                vascular_system: "Secondary growth with distinct xylem and phloem layers".into(),
                additional_information: "Fast-growing pioneer species. Nitrogen fixer improves soil. Can become invasive outside native range.".into(),
                indigenous_season: SeasonName::Waring,
                images: vec!["https://images.unsplash.com/photo-1615671524827-c1fe3973b648?w=800".into()],
                ..Default::default()
            },
        ),
        (
            "PLANT-004",
            PlantDetails {
                family: "Proteaceae".into(),
                botanical_name: "Banksia integrifolia".into(),
                common_name: "Banksia".into(),
                leaves_stems_memristems: "Leaves: Linear to oblong, dark green above, white-silver underneath, 4–20cm long\nStem: Woody, grey bark becoming rough with age\nMeristems: Terminal meristems produce characteristic flower spikes".into(),
                flowers: "Cylindrical pale yellow flower spike, 5–15cm long".into(),
                flowering_time_season: "Luk to Buarth Gurru (March - November)".into(),
                fruit_seed: "Woody follicles embedded in cone, release seeds after fire".into(),
                seed_collection_time_season: "Year-round, fire-triggered release".into(),
                additional_propagation_requirements: "Seed after heat treatment or smoke water, cuttings difficult".into(),
                trunk: "Single trunk, can grow 5–25m tall".into(),
                root_system: "Deep root system with proteoid roots for nutrient uptake".into(),
                vascular_system: "Well-developed secondary vascular tissue".into(),
                additional_information: "Important food source for nectar-feeding birds and insects. Fire-adapted species with serotinous seed release.".into(),
                indigenous_season: SeasonName::Luk,
                images: vec!["https://images.unsplash.com/photo-1582794543139-8ac9cb0f7b11?w=800".into()],
                ..Default::default()
            },
        ),
        (
            "PLANT-005",
            PlantDetails {
                family: "Myrtaceae".into(),
                botanical_name: "Callistemon citrinus".into(),
                common_name: "Bottlebrush".into(),
                leaves_stems_memristems: "Leaves: Linear to narrow-lanceolate, aromatic when crushed, 3–7cm long\nStem: Woody, papery bark peeling in strips\nMeristems: Terminal meristems produce bottlebrush-like flower spikes".into(),
                flowers: "Red cylindrical spike with prominent stamens, 5–10cm long".into(),
                flowering_time_season: "Poorneet to Biderap (September - February)".into(),
                fruit_seed: "Woody capsules persist on stems for years".into(),
                seed_collection_time_season: "Garrawang onwards (December+)".into(),
                additional_propagation_requirements: "Semi-hardwood cuttings in autumn, seed germination easy but slow".into(),
                trunk: "Multi-stemmed shrub or small tree".into(),
                root_system: "Fibrous root system, moderately deep".into(),
                vascular_system: "Typical dicot vascular arrangement with cambium".into(),
                additional_information: "Highly attractive to honeyeaters and lorikeets. Tolerates waterlogging and frost. Popular ornamental plant.".into(),
                indigenous_season: SeasonName::Poorneet,
                images: vec!["https://images.unsplash.com/photo-1566281796817-93bc94d7dbd2?w=800".into()],
                ..Default::default()
            },
        ),
    ]
}

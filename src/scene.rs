use super::*;

use crate::sphere::Sphere;

/// A scene is nothing more than the sphere list the octree is built over.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening scene file {}", path.display()))?;
        let scene: Self =
            ron::de::from_reader(BufReader::new(file)).with_context(|| format!("Parsing scene file {}", path.display()))?;
        Ok(scene)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating scene file {}", path.display()))?;
        ron::ser::to_writer_pretty(BufWriter::new(file), self, ron::ser::PrettyConfig::default())
            .with_context(|| format!("Writing scene file {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::MaterialKind;

    #[test]
    fn round_trips_through_ron() {
        let scene = Scene {
            spheres: vec![
                Sphere::new(na::Point3::new(0.0, 0.0, 0.0), 1.0, MaterialKind::Diffuse, ColorRgb::WHITE),
                Sphere::new(na::Point3::new(1.0, 2.0, 3.0), 0.5, MaterialKind::Metal, ColorRgb::new(0.8, 0.8, 0.8))
                    .with_fuzz(0.1),
            ],
        };
        let text = ron::ser::to_string(&scene).unwrap();
        let parsed: Scene = ron::de::from_str(&text).unwrap();
        assert_eq!(parsed.spheres.len(), scene.spheres.len());
        assert_eq!(parsed.spheres[1].fuzz, 0.1);
    }
}

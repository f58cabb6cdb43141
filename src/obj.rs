use std::fs::File;
use std::io::{ self, BufRead };
use std::path::{ Path, PathBuf };

use log::{ debug, warn };

use crate::error::{ Result, SceneError };
use crate::material::Material;
use crate::shape::Primitive;
use crate::vector::{ Point3D, Vector3D };

/// A parser for Wavefront OBJ meshes.
///
/// Only `v` and `f` commands are honored; everything else (comments, normals,
/// texture coordinates, groups) counts toward `ignored_lines`. Faces with
/// four vertices are fan-triangulated.
#[derive(Clone, Debug)]
pub struct ObjParser {
    path: PathBuf,
    offset: Vector3D,
    pub ignored_lines: usize,

    vertices: Vec<Point3D>,
    faces: Vec<[usize; 3]>,
}

impl ObjParser {
    /// Creates a parser for the mesh at `path`. Every vertex is shifted by
    /// `offset`, placing the mesh in the world.
    pub fn new(path: &Path, offset: Vector3D) -> ObjParser {
        ObjParser {
            path: path.into(),
            offset,
            ignored_lines: 0,
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Reads and parses the whole file.
    pub fn parse(&mut self) -> Result<()> {
        let file = File::open(&self.path).map_err(|source| {
            SceneError::MeshFile {
                path: self.path.display().to_string(),
                source,
            }
        })?;

        for (number, line) in io::BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| SceneError::MeshFile {
                path: self.path.display().to_string(),
                source,
            })?;

            self.handle_line(&line, number + 1)?;
        }

        debug!("parsed {}: {} vertices, {} triangles, {} lines ignored",
            self.path.display(),
            self.vertices.len(),
            self.faces.len(),
            self.ignored_lines);

        Ok(())
    }

    fn handle_line(&mut self, line: &str, number: usize) -> Result<()> {
        let params: Vec<&str> = line.split_whitespace().collect();

        match params.first() {
            Some(&"v") => self.handle_vertex(&params),
            Some(&"f") => self.handle_face(&params, number)?,
            Some(_) => self.ignored_lines += 1,
            None => {}
        }

        Ok(())
    }

    fn handle_vertex(&mut self, params: &[&str]) {
        if params.len() < 4 {
            self.ignored_lines += 1;
            return;
        }

        let coords: Vec<f64> = params[1..4]
            .iter()
            .filter_map(|p| p.parse().ok())
            .collect();

        match coords.as_slice() {
            [x, y, z] => {
                self.vertices
                    .push(Point3D::new(*x, *y, *z) + self.offset);
            }
            _ => self.ignored_lines += 1,
        }
    }

    /// One `f` command: three indices make a triangle, four make a quad that
    /// splits into (v1, v2, v3) and (v1, v3, v4). Indices are 1-based, with
    /// any `/`-separated texture or normal references ignored.
    fn handle_face(&mut self, params: &[&str], number: usize) -> Result<()> {
        if params.len() < 4 || params.len() > 5 {
            self.ignored_lines += 1;
            return Ok(());
        }

        let mut indices = Vec::with_capacity(params.len() - 1);
        for param in &params[1..] {
            indices.push(self.vertex_index(param, number)?);
        }

        self.faces.push([indices[0], indices[1], indices[2]]);
        if indices.len() == 4 {
            self.faces.push([indices[0], indices[2], indices[3]]);
        }

        Ok(())
    }

    fn vertex_index(&self, param: &str, number: usize) -> Result<usize> {
        let reference = param.split('/').next().unwrap_or(param);

        reference
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .ok_or_else(|| SceneError::MalformedMesh {
                path: self.path.display().to_string(),
                line: number,
                reason: format!("bad vertex reference {:?}", param),
            })
    }

    /// Converts the parsed faces into triangle primitives sharing `material`.
    ///
    /// Faces that reference vertices the file never defined are dropped with
    /// a warning, as partial meshes are still worth rendering.
    pub fn into_triangles(self, material: &Material) -> Vec<Primitive> {
        let mut triangles = Vec::with_capacity(self.faces.len());

        for face in &self.faces {
            if face.iter().any(|&i| i >= self.vertices.len()) {
                warn!("{}: face references undefined vertex, skipping",
                    self.path.display());
                continue;
            }

            triangles.push(Primitive::triangle(
                self.vertices[face[0]],
                self.vertices[face[1]],
                self.vertices[face[2]],
                material.clone()
            ));
        }

        triangles
    }
}

/// Loads an OBJ mesh as a list of triangle primitives.
pub fn load_mesh(path: &Path, offset: Vector3D, material: &Material)
    -> Result<Vec<Primitive>> {
    let mut parser = ObjParser::new(path, offset);
    parser.parse()?;
    Ok(parser.into_triangles(material))
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_obj(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const SQUARE: &str = "\
# a unit square in the XY plane
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn quad_fan_triangulates() {
        let path = temp_obj("prism_tracer_square.obj", SQUARE);
        let triangles =
            load_mesh(&path, Vector3D::zero(), &Material::default()).unwrap();

        assert_eq!(triangles.len(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn vertices_are_offset() {
        let path = temp_obj("prism_tracer_offset.obj", "v 1 2 3\n");
        let mut parser =
            ObjParser::new(&path, Vector3D::new(10.0, 0.0, 0.0));
        parser.parse().unwrap();

        assert_eq!(parser.vertices, vec![Point3D::new(11.0, 2.0, 3.0)]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn slash_references_use_leading_index() {
        let contents = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3/3/3\n";
        let path = temp_obj("prism_tracer_slashes.obj", contents);
        let triangles =
            load_mesh(&path, Vector3D::zero(), &Material::default()).unwrap();

        assert_eq!(triangles.len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_commands_are_counted_not_fatal() {
        let contents = "vn 0 1 0\ng top\nv 0 0 0\n";
        let path = temp_obj("prism_tracer_ignored.obj", contents);
        let mut parser = ObjParser::new(&path, Vector3D::zero());
        parser.parse().unwrap();

        assert_eq!(parser.ignored_lines, 2);
        assert_eq!(parser.vertices.len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn face_with_undefined_vertex_is_dropped() {
        let contents = "v 0 0 0\nv 1 0 0\nf 1 2 9\n";
        let path = temp_obj("prism_tracer_bad_face.obj", contents);
        let triangles =
            load_mesh(&path, Vector3D::zero(), &Material::default()).unwrap();

        assert!(triangles.is_empty());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn zero_index_is_malformed() {
        let contents = "v 0 0 0\nf 0 1 1\n";
        let path = temp_obj("prism_tracer_zero_index.obj", contents);
        let result =
            load_mesh(&path, Vector3D::zero(), &Material::default());

        assert!(matches!(result, Err(SceneError::MalformedMesh { .. })));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_a_mesh_error() {
        let result = load_mesh(
            Path::new("/definitely/not/a/mesh.obj"),
            Vector3D::zero(),
            &Material::default()
        );

        assert!(matches!(result, Err(SceneError::MeshFile { .. })));
    }
}

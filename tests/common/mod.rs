#![allow(dead_code)]

use std::path::{Path, PathBuf};

use kcd::{Catalog, DatasetSource};
use tempfile::TempDir;

pub const HEADER: &str = "상병기호,한글명,영문명\n";

pub const ROWS: &str = "\
A000,콜레라균에 의한 콜레라,Cholera due to Vibrio cholerae 01
A001,엘토르콜레라균에 의한 콜레라,Cholera due to Vibrio cholerae 01 biovar eltor
M170,양쪽 원발성 무릎관절증,Primary gonarthrosis bilateral
M4806,요추부 척추협착,Spinal stenosis lumbar region
M4802,경추부 척추협착,Spinal stenosis cervical region
";

pub fn write_euc_kr(path: &Path, contents: &str) {
    let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode(contents);
    assert!(!had_errors, "fixture is not representable in EUC-KR");
    std::fs::write(path, bytes).unwrap();
}

/// A temporary data directory holding the default master file.
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new(rows: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let path = DatasetSource::in_dir(dir.path()).path;
        write_euc_kr(&path, &format!("{HEADER}{rows}"));
        Fixture { dir, path }
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(DatasetSource::in_dir(self.dir.path()))
    }
}

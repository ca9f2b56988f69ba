//! Scenario tests for the directory-scan datasets

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use image::{Rgb, RgbImage};
use media_data_core::{Entry, Error as CoreError};
use media_data_readers::{
    BatchLoader, BatchLoaderOptions, ClassFolderDataset, DataType, Dataset, DatasetOptions, Error,
    FlatFolderDataset, Label, LoadingMethod,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::{tempdir, TempDir};

fn write_jpeg(path: &Path, shade: u8) {
    RgbImage::from_pixel(8, 6, Rgb([shade, 255 - shade, 40])).save(path).unwrap();
}

fn write_wav(path: &Path, seconds: u32, rate: u32) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..seconds * rate {
        writer.write_sample(((i % 200) as i16 - 100) * 50).unwrap();
    }
    writer.finalize().unwrap();
}

/// `parent/root/` with the given image names, returns (guard, root)
fn image_folder(names: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let root = dir.path().join("images");
    fs::create_dir(&root).unwrap();
    for (i, name) in names.iter().enumerate() {
        write_jpeg(&root.join(name), (i * 40) as u8);
    }
    (dir, root)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn options(data_type: DataType, loading_method: LoadingMethod) -> DatasetOptions {
    DatasetOptions::new(data_type, loading_method)
}

#[test]
fn test_flat_eager_without_labels() {
    let (_guard, root) = image_folder(&["a1.jpg", "a2.jpg", "a3.jpg"]);
    let dataset = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Eager)).unwrap();

    assert_eq!(dataset.len(), 3);
    let item = dataset.get(0).unwrap();
    assert_eq!(item.label, None);

    let expected = image::open(root.join("a1.jpg")).unwrap().to_rgb8();
    let image = item.data.into_datapoint().unwrap().into_image().unwrap();
    assert_eq!(image, expected);
}

#[test]
fn test_flat_sorts_by_embedded_number() {
    let (_guard, root) = image_folder(&["img10.jpg", "img2.jpg", "img1.jpg"]);
    let dataset = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Lazy)).unwrap();

    let names: Vec<String> = dataset
        .core()
        .entries()
        .iter()
        .map(|entry| match entry {
            Entry::Pending(path) => path.file_name().unwrap().to_string_lossy().into_owned(),
            Entry::Decoded(_) => panic!("lazy dataset decoded eagerly"),
        })
        .collect();
    assert_eq!(names, vec!["img1.jpg", "img2.jpg", "img10.jpg"]);
}

#[test]
fn test_flat_ignores_other_extensions() {
    let (_guard, root) = image_folder(&["a1.jpg", "a2.jpg"]);
    fs::write(root.join("notes.txt"), "ignore me").unwrap();
    write_wav(&root.join("sound.wav"), 1, 8_000);

    let dataset = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Lazy)).unwrap();
    assert_eq!(dataset.len(), 2);
}

#[test]
fn test_lazy_and_eager_agree() {
    let (_guard, root) = image_folder(&["p1.jpg", "p2.jpg", "p3.jpg", "p4.jpg"]);
    let lazy = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Lazy)).unwrap();
    let eager = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Eager)).unwrap();

    assert_eq!(lazy.len(), eager.len());
    for i in 0..lazy.len() {
        assert_eq!(lazy.get(i).unwrap(), eager.get(i).unwrap());
    }
}

#[test]
fn test_lazy_rereads_on_every_access() {
    init_tracing();
    let (_guard, root) = image_folder(&["p1.jpg"]);
    let lazy = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Lazy)).unwrap();
    assert!(!lazy.get(0).unwrap().data.is_failed());

    fs::write(root.join("p1.jpg"), b"overwritten with garbage").unwrap();
    assert!(lazy.get(0).unwrap().data.is_failed());
}

#[test]
fn test_corrupt_file_is_fail_soft() {
    init_tracing();
    let (_guard, root) = image_folder(&["ok1.jpg", "ok3.jpg"]);
    fs::write(root.join("bad2.jpg"), b"not an image").unwrap();

    for method in [LoadingMethod::Eager, LoadingMethod::Lazy] {
        let dataset = FlatFolderDataset::open(&root, &options(DataType::Image, method)).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.get(0).unwrap().data.is_failed());
        assert!(dataset.get(1).unwrap().data.is_failed());
        assert!(!dataset.get(2).unwrap().data.is_failed());
    }
}

#[test]
fn test_out_of_bounds_read() {
    let (_guard, root) = image_folder(&["a1.jpg"]);
    let dataset = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Eager)).unwrap();
    assert!(matches!(
        dataset.get(1),
        Err(CoreError::IndexOutOfBounds { index: 1, len: 1 })
    ));
}

#[test]
fn test_flat_labels_from_csv() {
    let (guard, root) = image_folder(&["c1.jpg", "c2.jpg", "c10.jpg"]);
    fs::write(guard.path().join("labels.csv"), "1,one\n2,two\n10,ten\n").unwrap();

    let opts = DatasetOptions {
        load_labels: true,
        ..options(DataType::Image, LoadingMethod::Lazy)
    };
    let dataset = FlatFolderDataset::open(&root, &opts).unwrap();

    assert_eq!(dataset.label_path(), guard.path().join("labels.csv"));
    assert_eq!(
        dataset.labels(),
        &[Label::from("one"), Label::from("two"), Label::from("ten")]
    );
    assert_eq!(dataset.get(2).unwrap().label, Some(Label::from("ten")));
}

#[test]
fn test_flat_skips_hidden_files_next_to_labels() {
    let (guard, root) = image_folder(&["img1.jpg", "img2.jpg"]);
    fs::write(root.join("._img1.jpg"), b"resource fork").unwrap();
    fs::write(guard.path().join("labels.csv"), "1,a\n2,b\n").unwrap();

    let unlabeled = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Eager)).unwrap();
    assert_eq!(unlabeled.len(), 2);

    let opts = DatasetOptions {
        load_labels: true,
        ..options(DataType::Image, LoadingMethod::Eager)
    };
    let dataset = FlatFolderDataset::open(&root, &opts).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.labels(), &[Label::from("a"), Label::from("b")]);
    assert!(dataset.iter().all(|item| !item.unwrap().data.is_failed()));
}

#[test]
fn test_flat_labels_count_mismatch_fails() {
    let (guard, root) = image_folder(&["c1.jpg", "c2.jpg", "c3.jpg"]);
    fs::write(guard.path().join("labels.csv"), "1,one\n2,two\n").unwrap();

    let opts = DatasetOptions {
        load_labels: true,
        ..options(DataType::Image, LoadingMethod::Lazy)
    };
    let err = FlatFolderDataset::open(&root, &opts).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(CoreError::LabelMismatch { labels: 2, datapoints: 3 })
    ));
}

#[test]
fn test_flat_missing_label_file_fails() {
    let (_guard, root) = image_folder(&["c1.jpg"]);
    let opts = DatasetOptions {
        load_labels: true,
        ..options(DataType::Image, LoadingMethod::Lazy)
    };
    assert!(matches!(FlatFolderDataset::open(&root, &opts), Err(Error::Io(_))));
}

#[test]
fn test_flat_explicit_labels_skip_csv() {
    let (_guard, root) = image_folder(&["c1.jpg", "c2.jpg"]);
    let opts = DatasetOptions {
        load_labels: true,
        ..options(DataType::Image, LoadingMethod::Lazy)
    };
    let dataset = FlatFolderDataset::open_with_labels(&root, &opts, vec![Label::Integer(0), Label::Integer(1)]).unwrap();
    assert_eq!(dataset.get(1).unwrap().label, Some(Label::Integer(1)));
}

#[test]
fn test_flat_audio_with_labels() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("audio");
    fs::create_dir(&root).unwrap();
    write_wav(&root.join("clip1.wav"), 1, 8_000);
    write_wav(&root.join("clip2.wav"), 2, 8_000);
    fs::write(dir.path().join("labels.csv"), "1,0.5\n2,0.9\n").unwrap();

    let opts = DatasetOptions {
        load_labels: true,
        ..options(DataType::Audio, LoadingMethod::Eager)
    };
    let dataset = FlatFolderDataset::open(&root, &opts).unwrap();

    let (data, label) = dataset.get(1).unwrap().into_parts();
    let clip = data.into_datapoint().unwrap().into_audio().unwrap();
    assert_eq!(clip.sample_rate, 8_000);
    assert!((clip.duration() - 2.0).abs() < 1e-9);
    assert_eq!(label, Some(Label::from("0.9")));
}

#[test]
fn test_flat_split_keeps_strategy_and_labels() {
    let names: Vec<String> = (1..=10).map(|i| format!("s{i}.jpg")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (guard, root) = image_folder(&refs);
    let rows: String = (1..=10).map(|i| format!("{i},label{i}\n")).collect();
    fs::write(guard.path().join("labels.csv"), rows).unwrap();

    let opts = DatasetOptions {
        load_labels: true,
        ..options(DataType::Image, LoadingMethod::Lazy)
    };
    let dataset = FlatFolderDataset::open(&root, &opts).unwrap();
    let (train, test) = dataset.split_with_rng(0.7, &mut StdRng::seed_from_u64(5)).unwrap();

    assert_eq!(train.len(), 7);
    assert_eq!(test.len(), 3);
    assert_eq!(train.label_path(), dataset.label_path());

    // every path still carries the label of its own file number
    for part in [&train, &test] {
        for (entry, label) in part.core().entries().iter().zip(part.labels()) {
            let Entry::Pending(path) = entry else {
                panic!("lazy split decoded eagerly");
            };
            let stem = path.file_stem().unwrap().to_string_lossy();
            assert_eq!(label, &Label::Text(format!("label{}", &stem[1..])));
        }
    }
}

#[test]
fn test_tree_counts_per_class() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for (class, count) in [("cat", 2), ("dog", 3)] {
        fs::create_dir(root.join(class)).unwrap();
        for i in 0..count {
            write_jpeg(&root.join(class).join(format!("{i}.jpg")), 10 * i as u8);
        }
    }
    fs::write(root.join("stray.jpg"), b"top-level files are not a class").unwrap();

    let dataset = ClassFolderDataset::open(root, &options(DataType::Image, LoadingMethod::Lazy)).unwrap();
    assert_eq!(dataset.len(), 5);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in dataset.labels() {
        *counts.entry(label.to_string()).or_default() += 1;
    }
    assert_eq!(counts.get("cat"), Some(&2));
    assert_eq!(counts.get("dog"), Some(&3));
    assert_eq!(dataset.classes().len(), 2);

    for item in dataset.iter() {
        let item = item.unwrap();
        assert!(item.label.is_some());
        assert!(!item.data.is_failed());
    }
}

#[test]
fn test_tree_audio_eager() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("speech")).unwrap();
    write_wav(&root.join("speech").join("x.wav"), 1, 4_000);

    let dataset = ClassFolderDataset::open(root, &options(DataType::Audio, LoadingMethod::Eager)).unwrap();
    let item = dataset.get(0).unwrap();
    assert_eq!(item.label, Some(Label::from("speech")));
    assert_eq!(item.data.datapoint().unwrap().as_audio().unwrap().samples.len(), 4_000);
}

#[test]
fn test_missing_root_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(FlatFolderDataset::open(&missing, &DatasetOptions::default()).is_err());
    assert!(ClassFolderDataset::open(&missing, &DatasetOptions::default()).is_err());
}

#[test]
fn test_batches_over_folder_dataset() {
    let names: Vec<String> = (1..=10).map(|i| format!("b{i}.jpg")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (_guard, root) = image_folder(&refs);
    let dataset = FlatFolderDataset::open(&root, &options(DataType::Image, LoadingMethod::Lazy)).unwrap();

    let loader = BatchLoader::new(
        &dataset,
        BatchLoaderOptions {
            batch_size: 4,
            shuffle: false,
            include_last_batch: true,
        },
    )
    .unwrap();

    let sizes: Vec<usize> = loader.iter().map(|batch| batch.unwrap().len()).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    for batch in &loader {
        for item in batch.unwrap() {
            assert!(item.data.datapoint().unwrap().as_image().is_some());
        }
    }
}

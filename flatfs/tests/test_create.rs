extern crate flatfs;
use flatfs::{FlatFSError, BLOCK_SIZE, DATA_BLOCK_START, DIRECT_BLOCKS, INODE_COUNT, MAX_FILE_SIZE};

mod common;
use common::*;

#[test]
fn test_create_allocates_blocks() {
    let (mut fs, _) = new_filesystem(1024 * 1024);

    fs.create("a", 5000).unwrap();

    let entry = fs.stat("a").unwrap();
    assert_eq!(entry.slot, 0);
    assert_eq!(entry.size, 5000);
    assert_eq!(entry.blocks, vec![DATA_BLOCK_START, DATA_BLOCK_START + 1]);

    let map = fs.inspect_block_map();
    for block in &entry.blocks {
        assert!(*block >= DATA_BLOCK_START && *block < map.total_blocks);
        assert!(map.occupancy[*block as usize]);
    }
}

#[test]
fn test_create_block_counts() {
    let (mut fs, _) = new_filesystem(1024 * 1024);

    let sizes = [
        (0, 0),
        (1, 1),
        (BLOCK_SIZE - 1, 1),
        (BLOCK_SIZE, 1),
        (BLOCK_SIZE + 1, 2),
        (3 * BLOCK_SIZE, 3),
        (MAX_FILE_SIZE, DIRECT_BLOCKS),
    ];

    for (i, (size, blocks)) in sizes.iter().enumerate() {
        let name = format!("file{}", i);
        fs.create(&name, *size).unwrap();

        assert_eq!(fs.stat(&name).unwrap().blocks.len(), *blocks, "size {}", size);
    }
}

#[test]
fn test_create_first_fit_after_delete() {
    let (mut fs, _) = new_filesystem(1024 * 1024);

    fs.create("a", BLOCK_SIZE).unwrap();
    fs.create("b", BLOCK_SIZE).unwrap();
    fs.delete("a").unwrap();
    fs.create("c", 2 * BLOCK_SIZE).unwrap();

    let entry = fs.stat("c").unwrap();
    assert_eq!(entry.slot, 0);
    assert_eq!(entry.blocks, vec![DATA_BLOCK_START, DATA_BLOCK_START + 2]);
}

#[test]
fn test_create_too_large() {
    let (mut fs, store) = new_filesystem(1024 * 1024);
    fs.create("existing", 100).unwrap();

    let files = fs.list_occupied_inodes();
    let map = fs.inspect_block_map();
    let disk = store.dump_disk();

    assert_eq!(
        fs.create("big", MAX_FILE_SIZE + 1),
        Err(FlatFSError::FileTooLarge)
    );
    assert_eq!(
        fs.create("huge", 11 * BLOCK_SIZE),
        Err(FlatFSError::FileTooLarge)
    );
    assert_eq!(fs.create("max", u32::MAX), Err(FlatFSError::FileTooLarge));

    assert_eq!(fs.list_occupied_inodes(), files);
    assert_eq!(fs.inspect_block_map(), map);
    assert_eq!(store.dump_disk(), disk);
    assert_eq!(fs.stat("big").err(), Some(FlatFSError::FileNotFound));
}

#[test]
fn test_create_fills_inode_table() {
    let (mut fs, _) = new_filesystem(1024 * 1024);

    for i in 0..INODE_COUNT {
        fs.create(&format!("file{}", i), 0).unwrap();
    }

    assert_eq!(fs.create("one_more", 0), Err(FlatFSError::NoFreeInode));
    assert_eq!(fs.list_occupied_inodes().len(), INODE_COUNT as usize);
    assert_eq!(fs.disk_info().free_file_slots(), 0);

    fs.delete("file17").unwrap();
    fs.create("one_more", 0).unwrap();
    assert_eq!(fs.stat("one_more").unwrap().slot, 17);
}

#[test]
fn test_create_full_table_persists() {
    let (mut fs, store) = new_filesystem(1024 * 1024);

    for i in 0..INODE_COUNT {
        fs.create(&format!("file{}", i), 1).unwrap();
    }

    drop(fs);
    let fs = remount(&store);

    let files = fs.list_occupied_inodes();
    assert_eq!(files.len(), INODE_COUNT as usize);
    assert_eq!(files[127].name, "file127");
    assert_eq!(files[127].blocks, vec![DATA_BLOCK_START + 127]);
}

#[test]
fn test_create_duplicate_name() {
    let (mut fs, _) = new_filesystem(1024 * 1024);

    fs.create("a", 10).unwrap();
    let map = fs.inspect_block_map();

    assert_eq!(fs.create("a", 10), Err(FlatFSError::FileExists));
    assert_eq!(fs.list_occupied_inodes().len(), 1);
    assert_eq!(fs.inspect_block_map(), map);
}

#[test]
fn test_create_invalid_names() {
    let (mut fs, _) = new_filesystem(1024 * 1024);
    let long_name: String = std::iter::repeat('n').take(64).collect();
    let longest_name: String = std::iter::repeat('n').take(63).collect();

    assert_eq!(fs.create("", 0), Err(FlatFSError::InvalidFileName));
    assert_eq!(fs.create(&long_name, 0), Err(FlatFSError::InvalidFileName));
    assert_eq!(fs.create("bad\0name", 0), Err(FlatFSError::InvalidFileName));
    assert_eq!(fs.create("bad\nname", 0), Err(FlatFSError::InvalidFileName));

    fs.create(&longest_name, 0).unwrap();
    assert_eq!(fs.stat(&longest_name).unwrap().name, longest_name);
}

#[test]
fn test_create_out_of_space_rolls_back() {
    // 3 data blocks
    let (mut fs, _) = new_filesystem(((DATA_BLOCK_START + 3) * BLOCK_SIZE) as usize);

    fs.create("small", BLOCK_SIZE).unwrap();
    let map = fs.inspect_block_map();

    assert_eq!(
        fs.create("large", 3 * BLOCK_SIZE),
        Err(FlatFSError::NoFreeSpace)
    );

    assert_eq!(fs.inspect_block_map(), map);
    assert_eq!(fs.disk_info().free_block_count(), 2);
    assert_eq!(fs.stat("large").err(), Some(FlatFSError::FileNotFound));

    // The two remaining blocks were not leaked.
    fs.create("fits", 2 * BLOCK_SIZE).unwrap();
    assert_eq!(fs.disk_info().free_block_count(), 0);
}

#[test]
fn test_create_names_are_exact() {
    let (mut fs, _) = new_filesystem(1024 * 1024);

    fs.create("name", 0).unwrap();
    fs.create("name2", 0).unwrap();
    fs.create("Name", 0).unwrap();

    assert_eq!(fs.stat("name").unwrap().slot, 0);
    assert_eq!(fs.stat("name2").unwrap().slot, 1);
    assert_eq!(fs.stat("Name").unwrap().slot, 2);
    assert_eq!(fs.stat("nam").err(), Some(FlatFSError::FileNotFound));
}

#[test]
fn test_create_write_error_leaves_no_file() {
    let (mut fs, store) = new_filesystem(1024 * 1024);
    let free = fs.disk_info().free_block_count();

    store.set_fail_writes(true);

    match fs.create("a", 5000) {
        Err(FlatFSError::IoError(_)) => (),
        other => panic!("expected an io error, got {:?}", other),
    }

    assert!(fs.list_occupied_inodes().is_empty());
    assert_eq!(fs.disk_info().free_block_count(), free);

    store.set_fail_writes(false);

    fs.create("a", 5000).unwrap();
    let entry = fs.stat("a").unwrap();
    assert_eq!(entry.slot, 0);
    assert_eq!(entry.blocks, vec![DATA_BLOCK_START, DATA_BLOCK_START + 1]);

    let fs = remount(&store);
    assert_eq!(fs.list_occupied_inodes().len(), 1);
    assert_eq!(fs.disk_info().free_block_count(), free - 2);
}

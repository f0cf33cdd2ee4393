use crate::set::{CODE_POINT_MAX, UnicodeSet};

fn ranges(s: &UnicodeSet) -> Vec<(u32, u32)> {
    s.ranges().collect()
}

#[test]
fn empty() {
    let s = UnicodeSet::new();
    assert!(s.is_empty());
    assert_eq!(s.char_count(), 0);
    assert!(!s.contains(0));
}

#[test]
fn single_and_range() {
    let s = UnicodeSet::single('a' as u32);
    assert!(s.contains('a' as u32));
    assert!(!s.contains('b' as u32));
    assert_eq!(s.char_count(), 1);

    let r = UnicodeSet::from_range(0x41, 0x5A);
    assert!(r.contains(0x41));
    assert!(r.contains(0x5A));
    assert!(!r.contains(0x40));
    assert!(!r.contains(0x5B));
    assert_eq!(r.char_count(), 26);
}

#[test]
fn inverted_range_is_empty() {
    let s = UnicodeSet::from_range(10, 5);
    assert!(s.is_empty());
}

#[test]
fn adjacent_ranges_merge() {
    let mut s = UnicodeSet::new();
    s.add_range(10, 20);
    s.add_range(21, 30);
    assert_eq!(ranges(&s), vec![(10, 30)]);

    s.add_range(5, 9);
    assert_eq!(ranges(&s), vec![(5, 30)]);
}

#[test]
fn overlapping_ranges_merge() {
    let mut s = UnicodeSet::new();
    s.add_range(10, 20);
    s.add_range(15, 40);
    s.add_range(100, 110);
    assert_eq!(ranges(&s), vec![(10, 40), (100, 110)]);
}

#[test]
fn disjoint_ranges_stay_separate() {
    let mut s = UnicodeSet::new();
    s.add(5);
    s.add(7);
    assert_eq!(ranges(&s), vec![(5, 5), (7, 7)]);
    assert_eq!(s.range_count(), 2);
}

#[test]
fn union() {
    let mut a = UnicodeSet::from_range(0, 10);
    let b = UnicodeSet::from_range(20, 30);
    a.add_set(&b);
    assert_eq!(ranges(&a), vec![(0, 10), (20, 30)]);
}

#[test]
fn difference() {
    let mut a = UnicodeSet::from_range(0, 100);
    let b = UnicodeSet::from_range(40, 60);
    a.remove_set(&b);
    assert_eq!(ranges(&a), vec![(0, 39), (61, 100)]);
}

#[test]
fn intersection() {
    let mut a = UnicodeSet::from_range(0, 50);
    a.add_range(80, 120);
    let mut b = UnicodeSet::from_range(40, 100);
    b.retain_set(&a);
    assert_eq!(ranges(&b), vec![(40, 50), (80, 100)]);
}

#[test]
fn complement_round_trip() {
    let mut s = UnicodeSet::from_range(0x100, 0x1FF);
    let original = s.clone();
    s.complement();
    assert!(!s.contains(0x100));
    assert!(s.contains(0));
    assert!(s.contains(CODE_POINT_MAX));
    assert_eq!(ranges(&s), vec![(0, 0xFF), (0x200, CODE_POINT_MAX)]);
    s.complement();
    assert_eq!(s, original);
}

#[test]
fn complement_of_empty_is_any() {
    let mut s = UnicodeSet::new();
    s.complement();
    assert_eq!(s, UnicodeSet::any());
    assert_eq!(s.char_count(), u64::from(CODE_POINT_MAX) + 1);
}

#[test]
fn complement_touching_the_top() {
    let mut s = UnicodeSet::from_range(0, CODE_POINT_MAX);
    s.complement();
    assert!(s.is_empty());

    let mut hi = UnicodeSet::from_range(0x10F000, CODE_POINT_MAX);
    hi.complement();
    assert_eq!(ranges(&hi), vec![(0, 0x10EFFF)]);
}

#[test]
fn membership_uses_binary_search_across_many_ranges() {
    let mut s = UnicodeSet::new();
    for i in 0..100u32 {
        s.add_range(i * 10, i * 10 + 3);
    }
    assert_eq!(s.range_count(), 100);
    assert!(s.contains(503));
    assert!(!s.contains(504));
    assert!(s.contains(990));
}

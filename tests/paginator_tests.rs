use rust_manga_parsers::Paginator;

#[test]
fn test_fixed_page_size() {
    let paginator = Paginator::new(24);
    assert_eq!(paginator.get_page(0), 1);
    assert_eq!(paginator.get_page(24), 2);
    assert_eq!(paginator.get_page(48), 3);
}

#[test]
fn test_site_returns_more_than_configured() {
    let mut paginator = Paginator::new(12);
    assert_eq!(paginator.get_page(0), 1);
    paginator.on_list_received(0, 1, 24);
    assert_eq!(paginator.get_page(24), 2);
    paginator.on_list_received(24, 2, 18);
    assert_eq!(paginator.get_page(42), 3);
}

#[test]
fn test_end_reach_is_stable() {
    let mut paginator = Paginator::new(24);
    for page in 1..=5 {
        let offset = (page - 1) * 24;
        assert_eq!(paginator.get_page(offset), page);
        paginator.on_list_received(offset, page, 24);
    }
    paginator.on_list_received(120, 6, 0);
    for _ in 0..5 {
        assert_eq!(paginator.get_page(120), 6);
    }
    for offset in [121, 144, 240, 1_000_000] {
        assert_eq!(paginator.get_page(offset), 6);
    }
}

#[test]
fn test_monotonic_for_many_sizes() {
    for size in 1..=64 {
        let paginator = Paginator::new(size);
        let mut previous = paginator.get_page(0);
        assert_eq!(previous, 1);
        for offset in 1..=500 {
            let page = paginator.get_page(offset);
            assert!(page >= previous, "size {} offset {}", size, offset);
            previous = page;
        }
    }
}

#[test]
fn test_monotonic_after_observations() {
    let observations = [(0, 1, 30), (30, 2, 15), (45, 4, 15), (60, 5, 0)];
    let mut paginator = Paginator::new(20);
    for (offset, page, count) in observations {
        paginator.on_list_received(offset, page, count);
        let pages: Vec<usize> = (0..300).map(|o| paginator.get_page(o)).collect();
        assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_independent_instances() {
    let mut browse = Paginator::new(20);
    let search = Paginator::new(10);
    browse.on_list_received(0, 1, 40);
    assert_eq!(browse.get_page(40), 2);
    assert_eq!(search.get_page(40), 5);
}

// * Static catalog data: retailer table, canonical brand list, travel keywords
// * The active retailer list is configuration, not contract; sites come and go.

/// One storefront the scraper knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetailerEntry {
    pub name: &'static str,
    pub base_url: &'static str,
    pub listing_url: &'static str,
    /// Search URL template; `{keyword}` is replaced with the url-encoded keyword
    pub search_url: &'static str,
    /// CSS selector matching product links on listing pages
    pub link_selector: &'static str,
    /// Query parameter used for listing pagination
    pub page_param: &'static str,
}

const SHOPIFY_LINKS: &str = "a[href*='/products/']";

// * Active retailers (unreachable or non-catalog sites are left out)
pub const RETAILERS: &[RetailerEntry] = &[
    RetailerEntry {
        name: "Mumzworld",
        base_url: "https://www.mumzworld.com/en",
        listing_url: "https://www.mumzworld.com/en/travel-gear/strollers-prams",
        search_url: "https://www.mumzworld.com/en/catalogsearch/result/?q={keyword}",
        link_selector: "a[href*='/en/'][href$='.html'], a.product-item-link",
        page_param: "p",
    },
    RetailerEntry {
        name: "Babyshop",
        base_url: "https://www.babyshopstores.com/ae/en",
        listing_url: "https://www.babyshopstores.com/ae/en/c/baby-gear-strollersandprams-strollers",
        search_url: "https://www.babyshopstores.com/ae/en/search?q={keyword}",
        link_selector: "a[href*='/p/'], [class*='product'] a[href*='/buy-']",
        page_param: "page",
    },
    RetailerEntry {
        name: "Mamas & Papas",
        base_url: "https://www.mamasandpapas.ae",
        listing_url: "https://www.mamasandpapas.ae/travel-strollers-carrycots-all-strollers/",
        search_url: "https://www.mamasandpapas.ae/?s={keyword}&post_type=product",
        link_selector: "a[href*='/product/']",
        page_param: "page",
    },
    RetailerEntry {
        name: "Ellie Junior",
        base_url: "https://www.ellijunior.com",
        listing_url: "https://www.ellijunior.com/collections/strollers",
        search_url: "https://www.ellijunior.com/search?q={keyword}",
        link_selector: SHOPIFY_LINKS,
        page_param: "page",
    },
    RetailerEntry {
        name: "Ounass",
        base_url: "https://www.ounass.ae",
        listing_url: "https://www.ounass.ae/kids/accessories/strollers/",
        search_url: "https://www.ounass.ae/search/?q={keyword}",
        link_selector: "a[href*='/product/'], a[href$='.html']",
        page_param: "page",
    },
    RetailerEntry {
        name: "Bloomingdales",
        base_url: "https://www.bloomingdales.ae",
        listing_url: "https://www.bloomingdales.ae/kids-baby/",
        search_url: "https://www.bloomingdales.ae/search?q={keyword}",
        link_selector: "a[href*='/product/'], .product-tile a[href]",
        page_param: "page",
    },
    RetailerEntry {
        name: "Galeries Lafayette",
        base_url: "https://www.galerieslafayette.ae",
        listing_url: "https://www.galerieslafayette.ae/ae/en/category/kids-baby-care-strollers-and-travel-strollers",
        search_url: "https://www.galerieslafayette.ae/ae/en/search?q={keyword}",
        link_selector: "a[href*='/product/']",
        page_param: "page",
    },
    RetailerEntry {
        name: "Five Little Ducks",
        base_url: "https://www.fivelittleducksme.com",
        listing_url: "https://www.fivelittleducksme.com/collections/strollers",
        search_url: "https://www.fivelittleducksme.com/search?q={keyword}",
        link_selector: SHOPIFY_LINKS,
        page_param: "page",
    },
    RetailerEntry {
        name: "Mothercare",
        base_url: "https://www.mothercare.ae/en",
        listing_url: "https://www.mothercare.ae/en/shop-strollers",
        search_url: "https://www.mothercare.ae/en/search?q={keyword}",
        link_selector: "a[href*='/p/'], a[href*='/product/']",
        page_param: "page",
    },
    RetailerEntry {
        name: "Jikel",
        base_url: "https://www.jikelbaby.ae",
        listing_url: "https://www.jikelbaby.ae/collections/strollers",
        search_url: "https://www.jikelbaby.ae/search?q={keyword}",
        link_selector: SHOPIFY_LINKS,
        page_param: "page",
    },
    RetailerEntry {
        name: "Birds and Bees",
        base_url: "https://www.birdsn-bees.com",
        listing_url: "https://www.birdsn-bees.com/collections/strollers",
        search_url: "https://www.birdsn-bees.com/search?q={keyword}",
        link_selector: SHOPIFY_LINKS,
        page_param: "page",
    },
    RetailerEntry {
        name: "Junior Couture",
        base_url: "https://www.juniorcouture.ae",
        listing_url: "https://www.juniorcouture.ae/en/strollers",
        search_url: "https://www.juniorcouture.ae/en/catalogsearch/result/?q={keyword}",
        link_selector: "a.product-item-link, .product-item a[href$='.html']",
        page_param: "p",
    },
    RetailerEntry {
        name: "Le Bouquet",
        base_url: "https://www.lebouquetbaby.com",
        listing_url: "https://www.lebouquetbaby.com/collections/strollers-prams",
        search_url: "https://www.lebouquetbaby.com/search?q={keyword}",
        link_selector: SHOPIFY_LINKS,
        page_param: "page",
    },
    RetailerEntry {
        name: "Baby Care",
        base_url: "https://www.bcbabycare.ae",
        listing_url: "https://www.bcbabycare.ae/collections/strollers",
        search_url: "https://www.bcbabycare.ae/search?q={keyword}",
        link_selector: SHOPIFY_LINKS,
        page_param: "page",
    },
    RetailerEntry {
        name: "Nanan",
        base_url: "https://www.nanan.ae/en",
        listing_url: "https://www.nanan.ae/en/strollers.html",
        search_url: "https://www.nanan.ae/en/catalogsearch/result/?q={keyword}",
        link_selector: "a.product-item-link, .product-item a[href$='.html']",
        page_param: "p",
    },
    RetailerEntry {
        name: "BabyLife UAE",
        base_url: "https://www.babylifeuae.com",
        listing_url: "https://www.babylifeuae.com/shop/category/gear-strollers-prams-2",
        search_url: "https://www.babylifeuae.com/shop?search={keyword}",
        link_selector: "a[href*='/shop/'][itemprop='url'], a[href*='/product/']",
        page_param: "page",
    },
];

/// Looks up a retailer entry by its exact display name
pub fn find_retailer(name: &str) -> Option<&'static RetailerEntry> {
    RETAILERS.iter().find(|r| r.name == name)
}

// * Canonical brand list. ORDER IS POLICY: the first match in a title wins,
// * so multi-word and specific names sit ahead of short generic ones.
pub const KNOWN_BRANDS: &[&str] = &[
    "Bugaboo", "Cybex", "Joie", "Silver Cross", "Stokke", "Babyzen",
    "UPPAbaby", "Mamas & Papas", "Maclaren", "Chicco", "Graco",
    "Baby Jogger", "Nuna", "Peg Perego", "iCandy", "Joolz",
    "GB", "Hauck", "Cosatto", "Jikel", "Doona", "Egg", "BabyStyle",
    "Leclerc", "Hamilton", "Ellie Junior", "Mima", "Thule",
    "Inglesina", "Uppababy", "ABC Design", "Bumbleride", "Mountain Buggy",
    "Phil & Teds", "Quinny", "Recaro", "Tutis", "Valco Baby",
    "Venicci", "Kinderkraft", "Lionelo", "Britax", "Evenflo",
    "Summer Infant", "Lorelli", "Cam", "Bebecar", "Emmaljunga",
    "Hartan", "Hesba", "Kunert", "Roan", "Bebetto", "Adamex",
    "Anex", "Camarelo", "Coletto", "Espiro", "Junama", "Tako",
    "Zippy", "Moon", "Bonavi", "Miniuno", "My Babiie", "Ickle Bubba",
    "Roma", "Colugo", "Mockingbird", "Bumprider", "Easywalker",
    "Greentom", "Mutsy", "Redsbaby", "Seed", "Oyster",
    "YOYO", "Bee", "Fox", "Dragonfly", "Butterfly",
];

// * Any of these (case-insensitive) in title/features/description marks a product travel friendly
pub const TRAVEL_KEYWORDS: &[&str] = &[
    "travel", "cabin size", "cabin approved", "compact fold",
    "lightweight", "airplane", "flight", "portable", "carry-on",
    "travel system", "travel-friendly", "travel friendly",
    "cabin-friendly", "plane", "aircraft",
];

// * Desktop user agents rotated per client
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];
